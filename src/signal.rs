use tokio::sync::broadcast;

/// One-shot gate that holds back every task of a batch until the batch is
/// fully spawned.
///
/// Releasing consumes the signal, so a gate fires at most once. Waiters that
/// subscribed before the release wake on the same event; waiting after the
/// release returns immediately because the channel is closed.
#[derive(Debug)]
pub struct StartSignal {
    tx: broadcast::Sender<()>,
}

#[derive(Debug)]
pub struct StartWaiter {
    rx: broadcast::Receiver<()>,
}

impl StartSignal {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> StartWaiter {
        StartWaiter {
            rx: self.tx.subscribe(),
        }
    }

    /// Fires the gate. Returns how many waiters were subscribed.
    pub fn release(self) -> usize {
        // No receivers just means an empty batch.
        self.tx.send(()).unwrap_or(0)
    }
}

impl Default for StartSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StartWaiter {
    /// Suspends until the gate is released.
    pub async fn wait(mut self) {
        // Both the broadcast value and the close that follows the sender's
        // drop mean the gate is open.
        let _ = self.rx.recv().await;
    }
}
