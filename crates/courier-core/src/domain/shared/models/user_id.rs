// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use courier_utils::id_string;

id_string!(
    /// The server's identifier of a user account.
    UserId
);
