//! Observer seam between the timer controller and its views

use tokio::sync::broadcast;
use tracing::debug;

use super::TimerEvent;

/// Push-only consumer of timer events.
///
/// Errors are reported back to the controller, which logs and ignores them.
pub trait TimerObserver: Send {
    fn notify(&mut self, event: &TimerEvent) -> Result<(), String>;
}

/// Fans events out to every subscriber of a broadcast channel
#[derive(Debug, Clone)]
pub struct BroadcastObserver {
    tx: broadcast::Sender<TimerEvent>,
}

impl BroadcastObserver {
    pub fn new(tx: broadcast::Sender<TimerEvent>) -> Self {
        Self { tx }
    }
}

impl TimerObserver for BroadcastObserver {
    fn notify(&mut self, event: &TimerEvent) -> Result<(), String> {
        match self.tx.send(event.clone()) {
            Ok(receivers) => {
                debug!("Delivered {} to {} subscribers", event.name(), receivers);
            }
            Err(_) => {
                // Nobody listening right now
                debug!("No subscribers for {}", event.name());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Settings;

    #[test]
    fn broadcast_without_subscribers_is_not_an_error() {
        let (tx, _) = broadcast::channel(4);
        let mut observer = BroadcastObserver::new(tx);
        let event = TimerEvent::RunningChanged { running: true };
        assert!(observer.notify(&event).is_ok());
    }

    #[tokio::test]
    async fn subscribers_receive_cloned_events() {
        let (tx, mut rx) = broadcast::channel(4);
        let mut observer = BroadcastObserver::new(tx);
        let event = TimerEvent::SettingsChanged {
            settings: Settings::default(),
        };
        observer.notify(&event).unwrap();
        assert_eq!(rx.recv().await.unwrap(), event);
    }
}
