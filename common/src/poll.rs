use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

pub const MATCH_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Runs `tick` every `period`, starting one period from now, until it breaks.
///
/// The timer is passed in so the same loop drives both the browser timer and
/// tokio's.
pub async fn poll<S, SF, T, TF>(period: Duration, mut sleep: S, mut tick: T)
where
    S: FnMut(Duration) -> SF,
    SF: Future<Output = ()>,
    T: FnMut() -> TF,
    TF: Future<Output = ControlFlow<()>>,
{
    loop {
        sleep(period).await;
        if tick().await.is_break() {
            break;
        }
    }
}
