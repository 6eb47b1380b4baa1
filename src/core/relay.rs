//! Provider-to-host event forwarding.
//!
//! Every provider signal is re-emitted to the host under the same event
//! type, stamped with the session tag when the signal lacks its own.
//! The internal item-complete bookkeeping event is suppressed (the
//! session's completion handler owns it), and error-class signals are
//! reported back so the session can advance the pod - forwarding happens
//! first, so recovery is serialized after the error's own relay.

use super::event_bus::EventBus;
use super::events::{InstreamEvent, ProviderEvent, ProviderSignal};

/// What the session should do after a signal was relayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayAction {
    /// Signal re-emitted to the host, nothing else to do
    Forwarded,
    /// Internal-only signal, not re-emitted
    Suppressed,
    /// Error-class signal re-emitted; advance the pod if items remain
    AdvancePod,
}

/// Forward one provider signal to the host bus.
pub fn forward(bus: &EventBus, signal: ProviderSignal, session_tag: Option<&str>) -> RelayAction {
    if signal.event == ProviderEvent::ItemComplete {
        return RelayAction::Suppressed;
    }

    let is_error = signal.event.is_error();
    let tag = signal.tag.or_else(|| session_tag.map(str::to_string));
    bus.emit(InstreamEvent::Provider { event: signal.event, tag });

    if is_error {
        RelayAction::AdvancePod
    } else {
        RelayAction::Forwarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PlaybackState;

    fn signal(event: ProviderEvent) -> ProviderSignal {
        event.into()
    }

    #[test]
    fn test_item_complete_suppressed() {
        let bus = EventBus::new();
        let action = forward(&bus, signal(ProviderEvent::ItemComplete), Some("t"));
        assert_eq!(action, RelayAction::Suppressed);
        assert!(bus.poll().is_empty());
    }

    #[test]
    fn test_session_tag_stamped_when_absent() {
        let bus = EventBus::new();
        forward(&bus, signal(ProviderEvent::State(PlaybackState::Playing)), Some("pod-tag"));
        let events = bus.poll();
        assert_eq!(
            events[0],
            InstreamEvent::Provider {
                event: ProviderEvent::State(PlaybackState::Playing),
                tag: Some("pod-tag".into()),
            }
        );
    }

    #[test]
    fn test_own_tag_wins() {
        let bus = EventBus::new();
        let signal = ProviderSignal {
            event: ProviderEvent::Time { position: 1.0, duration: 30.0 },
            tag: Some("creative-tag".into()),
        };
        forward(&bus, signal, Some("pod-tag"));
        let events = bus.poll();
        let InstreamEvent::Provider { tag, .. } = &events[0] else {
            panic!("expected relayed provider event");
        };
        assert_eq!(tag.as_deref(), Some("creative-tag"));
    }

    #[test]
    fn test_no_tag_at_all() {
        let bus = EventBus::new();
        forward(&bus, signal(ProviderEvent::State(PlaybackState::Paused)), None);
        let events = bus.poll();
        let InstreamEvent::Provider { tag, .. } = &events[0] else {
            panic!("expected relayed provider event");
        };
        assert!(tag.is_none());
    }

    #[test]
    fn test_errors_forward_then_request_advance() {
        let bus = EventBus::new();
        let action = forward(
            &bus,
            signal(ProviderEvent::MediaError { message: "bad creative".into() }),
            None,
        );
        assert_eq!(action, RelayAction::AdvancePod);
        // The error itself was still relayed to the host
        assert_eq!(bus.poll().len(), 1);

        let action = forward(&bus, signal(ProviderEvent::Error { message: "boom".into() }), None);
        assert_eq!(action, RelayAction::AdvancePod);
    }
}
