// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use courier_utils::id_string;

id_string!(
    /// The identifier of a message. It is generated by the sending client and stays stable for
    /// the lifetime of the message.
    MessageId
);
