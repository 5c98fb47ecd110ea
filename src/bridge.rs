//! KeyboardBridge: connects a keyboard source to a gamepad report sink.

use crate::input::{InputError, InputSource};
use crate::output::{HidReport, OutputError, ReportSink};
use crate::remapper::GamepadRemapper;
use crate::status::StatusSink;

/// A bridge that feeds key events through a remapper and forwards the
/// resulting gamepad report to a sink.
///
/// Reports are only sent when they differ from the last one sent.
///
/// # Error Handling
///
/// On input errors, the bridge releases every held control and sends a
/// neutral report to prevent stale inputs from persisting. Input sources
/// must then report keys that are still held as fresh presses (see
/// [`KeyboardLink::feed_line`](crate::tracker::KeyboardLink::feed_line)).
pub struct KeyboardBridge<I, R, S, K> {
    input: I,
    remapper: GamepadRemapper<R, S>,
    sink: K,
    last_sent: Option<R>,
}

impl<I, R, S, K> KeyboardBridge<I, R, S, K>
where
    I: InputSource,
    R: HidReport,
    S: StatusSink,
    K: ReportSink<R>,
{
    /// Create a new bridge from an input source, remapper and report sink.
    pub fn new(input: I, remapper: GamepadRemapper<R, S>, sink: K) -> Self {
        Self {
            input,
            remapper,
            sink,
            last_sent: None,
        }
    }

    /// Run the bridge, forwarding key events indefinitely.
    ///
    /// Shows the first bind prompt, then never returns.
    pub async fn run(&mut self) -> ! {
        self.remapper.begin();
        loop {
            if let Err(e) = self.process_one().await {
                debug!("bridge: {}", e);
            }
        }
    }

    /// Process a single key event and forward the report if it changed.
    ///
    /// Returns the result of the operation for testing purposes.
    pub async fn process_one(&mut self) -> Result<(), BridgeError> {
        match self.input.receive().await {
            Ok(event) => {
                self.remapper.handle_event(event);
                self.remapper.tick();
                self.flush().await
            }
            Err(e) => {
                // Send neutral state to prevent stale inputs
                self.remapper.release_all();
                *self.remapper.output_mut() = R::neutral();
                let _ = self.flush().await;
                Err(BridgeError::Input(e))
            }
        }
    }

    async fn flush(&mut self) -> Result<(), BridgeError> {
        let report = *self.remapper.output();
        if self.last_sent == Some(report) {
            return Ok(());
        }
        self.sink.send(&report).await.map_err(BridgeError::Output)?;
        self.last_sent = Some(report);
        Ok(())
    }

    /// Get a reference to the input source.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Get a mutable reference to the input source.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn remapper(&self) -> &GamepadRemapper<R, S> {
        &self.remapper
    }

    pub fn remapper_mut(&mut self) -> &mut GamepadRemapper<R, S> {
        &mut self.remapper
    }

    /// Get a reference to the report sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Decompose the bridge into its parts.
    pub fn into_parts(self) -> (I, GamepadRemapper<R, S>, K) {
        (self.input, self.remapper, self.sink)
    }
}

/// Error type for bridge operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// Error from the input source.
    Input(InputError),
    /// Error from the report sink.
    Output(OutputError),
}

impl core::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BridgeError::Input(e) => write!(f, "input: {e}"),
            BridgeError::Output(e) => write!(f, "output: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::config::RemapConfig;
    use crate::input::KeyEvent;
    use crate::keycode::{KeyCode, KeyModifiers, ESCAPE_CODE};
    use crate::parser::{encode_line, LinkMessage};
    use crate::tracker::{KeyboardLink, KeyboardReport};
    use crate::profile::{switch, SWITCH};
    use crate::report::SwitchReport;
    use crate::status::NullStatus;
    use core::future::Future;
    use core::pin::Pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
    use std::sync::{Arc, Mutex};
    use std::vec;
    use std::vec::Vec;

    // Simple mock input source
    struct MockInput {
        events: Vec<Result<KeyEvent, InputError>>,
        index: usize,
    }

    impl MockInput {
        fn new(events: Vec<Result<KeyEvent, InputError>>) -> Self {
            Self { events, index: 0 }
        }
    }

    impl InputSource for MockInput {
        fn receive(&mut self) -> impl Future<Output = Result<KeyEvent, InputError>> {
            let result = if self.index < self.events.len() {
                let r = self.events[self.index];
                self.index += 1;
                r
            } else {
                Err(InputError::Disconnected)
            };
            core::future::ready(result)
        }

        fn is_connected(&self) -> bool {
            self.index < self.events.len()
        }
    }

    // Input source decoding link lines through a real KeyboardLink
    struct LinkInput {
        lines: Vec<Vec<u8>>,
        index: usize,
        link: KeyboardLink,
    }

    impl LinkInput {
        fn new(lines: Vec<Vec<u8>>) -> Self {
            Self {
                lines,
                index: 0,
                link: KeyboardLink::new(),
            }
        }
    }

    impl InputSource for LinkInput {
        fn receive(&mut self) -> impl Future<Output = Result<KeyEvent, InputError>> {
            let result = loop {
                if let Some(event) = self.link.pop() {
                    break Ok(event);
                }
                let Some(line) = self.lines.get(self.index) else {
                    break Err(InputError::Disconnected);
                };
                self.index += 1;
                if let Err(e) = self.link.feed_line(line) {
                    break Err(e);
                }
            };
            core::future::ready(result)
        }

        fn is_connected(&self) -> bool {
            self.link.is_attached()
        }
    }

    fn key_line(keys: &[u8]) -> Vec<u8> {
        let mut slots = [0u8; 6];
        slots[..keys.len()].copy_from_slice(keys);
        let report = KeyboardReport {
            modifiers: KeyModifiers::empty(),
            reserved: 0,
            keys: slots,
        };
        Vec::from(&encode_line(&LinkMessage::Report(report))[..])
    }

    // Mock report sink, optionally failing every send
    struct MockSink {
        sent: Arc<Mutex<Vec<SwitchReport>>>,
        fail: Option<OutputError>,
    }

    impl MockSink {
        fn new() -> Self {
            Self {
                sent: Arc::new(Mutex::new(Vec::new())),
                fail: None,
            }
        }
    }

    impl ReportSink<SwitchReport> for MockSink {
        fn send(&mut self, report: &SwitchReport) -> impl Future<Output = Result<(), OutputError>> {
            let result = match self.fail {
                Some(e) => Err(e),
                None => {
                    self.sent.lock().unwrap().push(*report);
                    Ok(())
                }
            };
            core::future::ready(result)
        }

        fn is_ready(&self) -> bool {
            self.fail.is_none()
        }
    }

    // Helper to run a future to completion (simple blocking executor)
    fn block_on<F: Future>(mut f: F) -> F::Output {
        fn noop_raw_waker() -> RawWaker {
            fn noop(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                noop_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
            RawWaker::new(core::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
        let mut cx = Context::from_waker(&waker);

        // SAFETY: We don't move f after pinning
        let mut f = unsafe { Pin::new_unchecked(&mut f) };

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {
                    panic!("Mock future returned Pending unexpectedly");
                }
            }
        }
    }

    fn bridge(
        events: Vec<Result<KeyEvent, InputError>>,
        sink: MockSink,
    ) -> KeyboardBridge<MockInput, SwitchReport, NullStatus, MockSink> {
        let remapper =
            GamepadRemapper::new(RemapConfig::new(&SWITCH), SwitchReport::neutral(), NullStatus);
        KeyboardBridge::new(MockInput::new(events), remapper, sink)
    }

    #[test]
    fn test_bridge_forwards_changed_reports() {
        let sink = MockSink::new();
        let sent_ref = sink.sent.clone();
        let mut bridge = bridge(
            vec![
                Ok(KeyEvent::Press(ESCAPE_CODE)),
                Ok(KeyEvent::Press(KeyCode::V.0)),
                Ok(KeyEvent::Decoded(b'v')),
                Ok(KeyEvent::Release(KeyCode::V.0)),
            ],
            sink,
        );

        for _ in 0..4 {
            assert!(block_on(bridge.process_one()).is_ok());
        }

        let sent = sent_ref.lock().unwrap();
        let mut pressed = SwitchReport::neutral();
        pressed.buttons = 1 << switch::A;
        // The decoded event changes nothing and sends nothing.
        assert_eq!(*sent, [SwitchReport::neutral(), pressed, SwitchReport::neutral()]);
    }

    #[test]
    fn test_bridge_sends_neutral_on_error() {
        let sink = MockSink::new();
        let sent_ref = sink.sent.clone();
        let mut bridge = bridge(
            vec![
                Ok(KeyEvent::Press(ESCAPE_CODE)),
                Ok(KeyEvent::Press(KeyCode::SPACE.0)),
                Ok(KeyEvent::Press(KeyCode::Z.0)),
                Err(InputError::Disconnected),
            ],
            sink,
        );

        for _ in 0..3 {
            block_on(bridge.process_one()).unwrap();
        }
        let result = block_on(bridge.process_one());
        assert!(matches!(
            result,
            Err(BridgeError::Input(InputError::Disconnected))
        ));

        let sent = sent_ref.lock().unwrap();
        assert_eq!(sent.last(), Some(&SwitchReport::neutral()));
        assert!(bridge.remapper().active().is_empty());
        assert!(bridge.remapper().held().is_empty());
    }

    #[test]
    fn test_bridge_keeps_bindings_after_error() {
        let sink = MockSink::new();
        let mut bridge = bridge(
            vec![
                Ok(KeyEvent::Press(ESCAPE_CODE)),
                Err(InputError::Checksum),
                Ok(KeyEvent::Press(KeyCode::C.0)),
            ],
            sink,
        );

        block_on(bridge.process_one()).unwrap();
        assert!(block_on(bridge.process_one()).is_err());
        block_on(bridge.process_one()).unwrap();
        assert_eq!(bridge.remapper().output().buttons, 1 << switch::B);
    }

    #[test]
    fn test_bridge_repress_held_key_after_bad_line() {
        let sink = MockSink::new();
        let sent_ref = sink.sent.clone();
        let input = LinkInput::new(vec![
            key_line(&[ESCAPE_CODE]),
            key_line(&[]),
            key_line(&[KeyCode::V.0]),
            Vec::from(&b"K0000000000000000*ZZ\n"[..]),
            key_line(&[KeyCode::V.0]),
            key_line(&[KeyCode::V.0]),
        ]);
        let remapper =
            GamepadRemapper::new(RemapConfig::new(&SWITCH), SwitchReport::neutral(), NullStatus);
        let mut bridge = KeyboardBridge::new(input, remapper, sink);

        let mut pressed = SwitchReport::neutral();
        pressed.buttons = 1 << switch::A;

        // Escape press, its decoded byte and release, then V and its decoded byte.
        for _ in 0..5 {
            block_on(bridge.process_one()).unwrap();
        }
        assert_eq!(*bridge.remapper().output(), pressed);

        let result = block_on(bridge.process_one());
        assert_eq!(result, Err(BridgeError::Input(InputError::Parse)));
        assert_eq!(*bridge.remapper().output(), SwitchReport::neutral());

        // V is still held in the next report and comes back.
        block_on(bridge.process_one()).unwrap();
        assert_eq!(*bridge.remapper().output(), pressed);
        assert!(bridge.remapper().active().is_pressed(switch::A));

        let sent = sent_ref.lock().unwrap();
        assert_eq!(sent.last(), Some(&pressed));
    }

    #[test]
    fn test_bridge_output_error() {
        let mut sink = MockSink::new();
        sink.fail = Some(OutputError::NotReady);
        let mut bridge = bridge(vec![Ok(KeyEvent::Press(0x04))], sink);

        let result = block_on(bridge.process_one());
        assert_eq!(result, Err(BridgeError::Output(OutputError::NotReady)));
        assert!(!bridge.sink().is_ready());
    }
}
