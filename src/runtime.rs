//! Event plumbing for the binary and for headless tests.
//!
//! All session mutation happens on the single consumer of the
//! `EventBus`; the input pump, the tick thread, and text-generation
//! workers only ever send events into it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Unified event type consumed by the app loop.
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// One elapsed second while the session is playing.
    Tick,
    /// A text-generation worker finished.
    TextReady(String),
}

/// mpsc pair with a cloneable sender for worker threads.
pub struct EventBus {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<AppEvent> {
        self.tx.clone()
    }

    pub fn recv(&self) -> Result<AppEvent, RecvError> {
        self.rx.recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward crossterm terminal events into the bus. Exits when the bus
/// is gone or the terminal read fails.
pub fn spawn_input_pump(tx: Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::read() {
            Ok(CtEvent::Key(key)) => {
                if tx.send(AppEvent::Key(key)).is_err() {
                    break;
                }
            }
            Ok(CtEvent::Resize(_, _)) => {
                if tx.send(AppEvent::Resize).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    });
}

/// A cancellable repeating timer. The thread sends one `Tick` per
/// interval until stopped; `stop` is idempotent and also runs on drop,
/// so a handle can never outlive its owner.
pub struct TickHandle {
    stop: Arc<AtomicBool>,
}

impl TickHandle {
    pub fn spawn(tx: Sender<AppEvent>) -> Self {
        Self::spawn_with_interval(tx, TICK_INTERVAL)
    }

    pub fn spawn_with_interval(tx: Sender<AppEvent>, interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        thread::spawn(move || loop {
            thread::sleep(interval);
            if flag.load(Ordering::Relaxed) {
                break;
            }
            if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        });
        Self { stop }
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start/stop discipline for the session tick: at most one handle
/// alive, armed exactly while the session is playing.
pub struct Ticker {
    tx: Sender<AppEvent>,
    interval: Duration,
    handle: Option<TickHandle>,
}

impl Ticker {
    pub fn new(tx: Sender<AppEvent>) -> Self {
        Self::with_interval(tx, TICK_INTERVAL)
    }

    pub fn with_interval(tx: Sender<AppEvent>, interval: Duration) -> Self {
        Self {
            tx,
            interval,
            handle: None,
        }
    }

    /// Idempotent: a running ticker is left alone.
    pub fn start(&mut self) {
        if self.handle.is_none() {
            self.handle = Some(TickHandle::spawn_with_interval(
                self.tx.clone(),
                self.interval,
            ));
        }
    }

    /// Idempotent: stopping a stopped ticker is a no-op.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_delivers_in_order() {
        let bus = EventBus::new();
        let tx = bus.sender();
        tx.send(AppEvent::Resize).unwrap();
        tx.send(AppEvent::TextReady("hi".to_string())).unwrap();

        assert!(matches!(bus.recv().unwrap(), AppEvent::Resize));
        match bus.recv().unwrap() {
            AppEvent::TextReady(text) => assert_eq!(text, "hi"),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_tick_handle_produces_ticks_then_stops() {
        let bus = EventBus::new();
        let handle = TickHandle::spawn_with_interval(bus.sender(), Duration::from_millis(5));

        // collect a couple of ticks
        for _ in 0..2 {
            match bus.recv_timeout(Duration::from_millis(500)) {
                Ok(AppEvent::Tick) => {}
                other => panic!("expected tick, got {other:?}"),
            }
        }

        handle.stop();
        // drain whatever was in flight, then expect silence
        while bus.recv_timeout(Duration::from_millis(20)).is_ok() {}
        assert!(bus.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_ticker_start_stop_idempotent() {
        let bus = EventBus::new();
        let mut ticker = Ticker::with_interval(bus.sender(), Duration::from_millis(5));
        assert!(!ticker.is_running());

        ticker.start();
        ticker.start();
        assert!(ticker.is_running());

        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_running());

        while bus.recv_timeout(Duration::from_millis(20)).is_ok() {}
        assert!(bus.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_tick_handle_stops_on_drop() {
        let bus = EventBus::new();
        {
            let _handle = TickHandle::spawn_with_interval(bus.sender(), Duration::from_millis(5));
            assert!(matches!(
                bus.recv_timeout(Duration::from_millis(500)),
                Ok(AppEvent::Tick)
            ));
        }
        while bus.recv_timeout(Duration::from_millis(20)).is_ok() {}
        assert!(bus.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
