//! Property tests over generated plain-text deltas.

use crate::common::{basic_formats, to_html};
use delta_babel::{ConvertOptions, Delta, FormatRegistry, Operation};
use proptest::prelude::*;

fn plain_delta(chunks: &[String]) -> Delta {
    Delta::new(chunks.iter().map(Operation::text).collect())
}

proptest! {
    #[test]
    fn plain_inserts_make_one_line(
        chunks in prop::collection::vec("[a-zA-Z0-9 ,.!?]{1,12}", 1..8)
    ) {
        let registry = FormatRegistry::new();
        let html = to_html(&plain_delta(&chunks), &registry, &ConvertOptions::default());
        prop_assert_eq!(html, format!("<div>{}</div>", chunks.concat()));
    }

    #[test]
    fn every_newline_closes_one_line(lines in prop::collection::vec("[a-z ]{0,8}", 1..10)) {
        let text: String = lines.iter().map(|line| format!("{line}\n")).collect();
        let registry = FormatRegistry::new();
        let html = to_html(&plain_delta(&[text]), &registry, &ConvertOptions::default());
        prop_assert_eq!(html.matches("<div>").count(), lines.len());
    }

    #[test]
    fn conversion_is_deterministic(
        chunks in prop::collection::vec("[a-z\n]{0,10}", 0..8),
        bold in any::<bool>(),
    ) {
        let ops: Vec<Operation> = chunks
            .iter()
            .map(|chunk| {
                let op = Operation::text(chunk.as_str());
                if bold { op.with_attribute("bold", true) } else { op }
            })
            .collect();
        let delta = Delta::new(ops);
        let registry = basic_formats();
        let options = ConvertOptions::default();

        let first = to_html(&delta, &registry, &options);
        let second = to_html(&delta, &registry, &options);
        prop_assert!(!first.contains('\n'));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn grouped_lines_share_one_wrapper(count in 1usize..12) {
        let ops: Vec<Operation> = (0..count)
            .flat_map(|i| [
                Operation::text(format!("item {i}")),
                Operation::text("\n").with_attribute("bullet", true),
            ])
            .collect();
        let html = to_html(&Delta::new(ops), &basic_formats(), &ConvertOptions::default());
        prop_assert_eq!(html.matches("<ul>").count(), 1);
        prop_assert_eq!(html.matches("<li>").count(), count);
    }
}
