use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use tokio::sync::oneshot;

use crate::error::{RelayError, Result};

/// Handle to a future that the runtime keeps alive until it settles.
///
/// Awaiting the handle yields the future's result. Dropping it detaches the
/// work without cancelling it.
pub struct RetainedTask<T> {
    receiver: oneshot::Receiver<Result<T>>,
}

impl<T> Future for RetainedTask<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.receiver.poll_unpin(cx).map(|settled| match settled {
            Ok(result) => result,
            Err(_) => Err(RelayError::Runtime(
                "retained task dropped before settling".to_string(),
            )),
        })
    }
}

/// Spawns `future` onto the current tokio runtime, which owns it until it
/// resolves. Everything the future captured is released as soon as it
/// settles, on success and on failure alike.
pub fn retain_until_complete<F, T>(future: F) -> RetainedTask<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    tokio::spawn(async move {
        let result = future.await;
        // Nobody may be listening any more.
        let _ = sender.send(result);
    });
    RetainedTask { receiver }
}
