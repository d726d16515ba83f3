//! Log events emitted by a partition call.

use std::fmt;
use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use teamforge::prelude::*;
use teamforge_test::roster::make_roster;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::Registry;

/// Collects the `event` field of every event seen on the current thread.
#[derive(Clone, Default)]
struct EventNames(Arc<Mutex<Vec<String>>>);

impl<S: Subscriber> Layer<S> for EventNames {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventField(None);
        event.record(&mut visitor);
        if let Some(name) = visitor.0 {
            self.0.lock().unwrap().push(name);
        }
    }
}

struct EventField(Option<String>);

impl Visit for EventField {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "event" {
            self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
}

#[test]
fn facade_and_engine_start_events_are_distinct() {
    for kind in [EngineKind::Exact, EngineKind::LocalSwap, EngineKind::Greedy] {
        let names = EventNames::default();
        let subscriber = Registry::default().with(names.clone());
        let roster = make_roster([3, 4, 4, 4], &mut ChaCha8Rng::seed_from_u64(21));

        tracing::subscriber::with_default(subscriber, || {
            TeamForge::new(EngineConfig::default().with_engine(kind))
                .partition_with_rng(&roster, 3, &mut ChaCha8Rng::seed_from_u64(22))
                .unwrap();
        });

        let names = names.0.lock().unwrap();
        let count = |name: &str| names.iter().filter(|n| *n == name).count();
        assert_eq!(count("partition_start"), 1, "{kind:?}");
        assert_eq!(count("engine_start"), 1, "{kind:?}");
        assert_eq!(count("partition_end"), 1, "{kind:?}");
    }
}
