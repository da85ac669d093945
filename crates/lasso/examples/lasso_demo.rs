//! Draw a few synthetic lassos over a small field and print what they caught.
//!
//! Usage:
//!   cargo run -p lasso --example lasso_demo -- [seed]

use lasso::api::{lasso_stroke, target_field, Entity, LassoCfg, LassoReplay, LassoShape, Session, StrokeEvent};

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(2025);
    let mut session = Session::new(LassoCfg::default()).unwrap();
    let targets = target_field(4, 6.0, LassoReplay::new(seed, 0));
    for p in &targets {
        session.spawn(Entity::health(*p, 5, 2));
    }
    let mut tok = LassoReplay::new(seed, 1);
    for (pointer, center) in targets.iter().enumerate() {
        let shape = LassoShape {
            center: *center,
            ..LassoShape::default()
        };
        let samples = lasso_stroke(&shape, tok);
        tok = tok.next();
        let pointer = pointer as u32;
        session.pointer_down(pointer, samples[0].0);
        for (p, _) in &samples[1..] {
            session.update(shape.dt);
            session.pointer_move(pointer, *p);
        }
        for (_, ev) in session.update(shape.dt) {
            if let StrokeEvent::LoopDetected {
                captured,
                multiplier,
                ..
            } = ev
            {
                println!(
                    "pointer {pointer}: captured={} multiplier={multiplier:.2}",
                    captured.len()
                );
            }
        }
        session.pointer_up(pointer);
    }
    println!(
        "loops={} score={} events={}",
        session.loops(),
        session.score(),
        session.drain_events().len()
    );
}
