use chart_motion::core::Rect;
use chart_motion::layout::{LabelBox, LabelCollisionConfig, resolve_label_collisions};
use proptest::prelude::*;

const BOUNDS: Rect = Rect::new(0.0, 0.0, 320.0, 400.0);

fn boxes_strategy() -> impl Strategy<Value = Vec<LabelBox>> {
    prop::collection::vec((4.0f64..24.0, -50.0f64..450.0, 0.0f64..300.0), 1..14).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (height, y, x))| LabelBox::new(format!("series-{i}"), 40.0, height, x, y))
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn fitting_labels_are_separated_and_inside_bounds(boxes in boxes_strategy()) {
        let config = LabelCollisionConfig::new(BOUNDS);
        let resolution = resolve_label_collisions(&boxes, config).expect("resolve");
        prop_assert_eq!(resolution.adjustments.len(), boxes.len());

        let mut placed: Vec<(f64, f64)> = boxes
            .iter()
            .map(|label| (resolution.adjustments[&label.id].y, label.height / 2.0))
            .collect();
        placed.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (y, half) in &placed {
            prop_assert!(y - half >= BOUNDS.y - 1e-6);
            prop_assert!(y + half <= BOUNDS.bottom() + 1e-6);
        }
        for pair in placed.windows(2) {
            let required = pair[0].1 + pair[1].1 + config.min_gap;
            prop_assert!(pair[1].0 - pair[0].0 >= required - 1e-6);
        }
    }

    #[test]
    fn resolution_is_a_fixed_point(boxes in boxes_strategy()) {
        let config = LabelCollisionConfig::new(BOUNDS);
        let first = resolve_label_collisions(&boxes, config).expect("first pass");

        let replayed: Vec<LabelBox> = boxes
            .iter()
            .map(|label| {
                let adjustment = first.adjustments[&label.id];
                LabelBox::new(label.id.clone(), label.width, label.height, adjustment.x, adjustment.y)
            })
            .collect();
        let second = resolve_label_collisions(&replayed, config).expect("second pass");

        prop_assert_eq!(first.side, second.side);
        for (id, adjustment) in &first.adjustments {
            let again = second.adjustments[id];
            prop_assert!((adjustment.y - again.y).abs() <= 1e-6);
            prop_assert_eq!(adjustment.x, again.x);
        }
    }

    #[test]
    fn anchors_stay_within_horizontal_bounds(boxes in boxes_strategy()) {
        let resolution = resolve_label_collisions(&boxes, LabelCollisionConfig::new(BOUNDS))
            .expect("resolve");
        for adjustment in resolution.adjustments.values() {
            prop_assert!(adjustment.x >= BOUNDS.x && adjustment.x <= BOUNDS.right());
            prop_assert_eq!(adjustment.side, resolution.side);
        }
    }
}

fn overfull_strategy() -> impl Strategy<Value = (Rect, Vec<LabelBox>)> {
    (
        0.0f64..80.0,
        prop::collection::vec((4.0f64..60.0, -50.0f64..200.0), 1..10),
    )
        .prop_map(|(height, specs)| {
            let bounds = Rect::new(0.0, 20.0, 320.0, height);
            let boxes = specs
                .into_iter()
                .enumerate()
                .map(|(i, (label_height, y))| {
                    LabelBox::new(format!("series-{i}"), 40.0, label_height, 10.0, y)
                })
                .collect();
            (bounds, boxes)
        })
}

proptest! {
    #[test]
    fn overfull_labels_keep_centers_inside_bounds((bounds, boxes) in overfull_strategy()) {
        let config = LabelCollisionConfig::new(bounds);
        let resolution = resolve_label_collisions(&boxes, config).expect("resolve");
        prop_assert_eq!(resolution.adjustments.len(), boxes.len());

        for adjustment in resolution.adjustments.values() {
            prop_assert!(adjustment.y >= bounds.y - 1e-6);
            prop_assert!(adjustment.y <= bounds.bottom() + 1e-6);
        }

        let required: f64 = boxes.iter().map(|label| label.height).sum::<f64>()
            + config.min_gap * (boxes.len() - 1) as f64;
        if required <= bounds.height {
            for (label, adjustment) in boxes.iter().zip(resolution.adjustments.values()) {
                prop_assert!(adjustment.y - label.height / 2.0 >= bounds.y - 1e-6);
                prop_assert!(adjustment.y + label.height / 2.0 <= bounds.bottom() + 1e-6);
            }
        }
    }

    #[test]
    fn overfull_resolution_is_a_fixed_point((bounds, boxes) in overfull_strategy()) {
        let config = LabelCollisionConfig::new(bounds);
        let first = resolve_label_collisions(&boxes, config).expect("first pass");

        let replayed: Vec<LabelBox> = boxes
            .iter()
            .map(|label| {
                let adjustment = first.adjustments[&label.id];
                LabelBox::new(label.id.clone(), label.width, label.height, adjustment.x, adjustment.y)
            })
            .collect();
        let second = resolve_label_collisions(&replayed, config).expect("second pass");

        for (id, adjustment) in &first.adjustments {
            prop_assert!((adjustment.y - second.adjustments[id].y).abs() <= 1e-6);
        }
    }
}
