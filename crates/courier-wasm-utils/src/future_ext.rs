// courier/courier-wasm-utils
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::future::Future;

use futures::FutureExt;

impl<T: ?Sized> CourierFutureExt for T where T: Future {}

pub trait CourierFutureExt: Future {
    #[cfg(target_arch = "wasm32")]
    fn pinned<'a>(self) -> futures::future::LocalBoxFuture<'a, Self::Output>
    where
        Self: Sized + 'a,
    {
        self.boxed_local()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn pinned<'a>(self) -> futures::future::BoxFuture<'a, Self::Output>
    where
        Self: Sized + Send + 'a,
    {
        self.boxed()
    }
}
