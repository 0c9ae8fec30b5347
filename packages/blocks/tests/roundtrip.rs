//! Snapshot round-trip over generated block trees

use folio_blocks::{
    parse_snapshot, to_snapshot, Block, BlockKind, BlockTree, CheckProps, HeadingLevel,
    HeadingProps, InlineContent, MediaKind, MediaProps, Styles, TextAlignment, TextProps,
};
use proptest::prelude::*;
use std::cell::Cell;

fn alignment() -> impl Strategy<Value = TextAlignment> {
    prop_oneof![
        Just(TextAlignment::Left),
        Just(TextAlignment::Center),
        Just(TextAlignment::Right),
        Just(TextAlignment::Justify),
    ]
}

fn inline() -> impl Strategy<Value = InlineContent> + Clone {
    prop_oneof![
        ("[a-zA-Z ]{0,12}", any::<bool>(), any::<bool>()).prop_map(|(text, bold, code)| {
            InlineContent::styled(
                text,
                Styles {
                    bold,
                    code,
                    ..Styles::default()
                },
            )
        }),
        ("[a-z]{1,8}", "[a-z ]{1,8}")
            .prop_map(|(host, text)| InlineContent::link(format!("https://{}.test", host), text)),
    ]
}

// Quarter steps stay exact in binary, so the printed width parses back unchanged.
fn preview_width() -> impl Strategy<Value = f64> {
    (64u32..1024, 0u8..4).prop_map(|(px, quarter)| f64::from(px) + f64::from(quarter) * 0.25)
}

fn kind() -> impl Strategy<Value = BlockKind> {
    let content = prop::collection::vec(inline(), 0..3);
    prop_oneof![
        (alignment(), content.clone()).prop_map(|(text_alignment, content)| {
            BlockKind::Paragraph {
                props: TextProps {
                    text_alignment,
                    ..TextProps::default()
                },
                content,
            }
        }),
        (1u8..=3, content.clone()).prop_map(|(level, content)| BlockKind::Heading {
            props: HeadingProps::with_level(HeadingLevel::try_from(level).unwrap()),
            content,
        }),
        content.clone().prop_map(|content| BlockKind::BulletListItem {
            props: TextProps::default(),
            content,
        }),
        content.clone().prop_map(|content| BlockKind::NumberedListItem {
            props: TextProps::default(),
            content,
        }),
        (any::<bool>(), content).prop_map(|(checked, content)| BlockKind::CheckListItem {
            props: CheckProps {
                checked,
                ..CheckProps::default()
            },
            content,
        }),
        (
            prop_oneof![
                Just(MediaKind::Image),
                Just(MediaKind::Video),
                Just(MediaKind::Audio),
                Just(MediaKind::File),
            ],
            "(https://store/[a-z]{1,6}\\.png)?",
            prop::option::of(preview_width()),
        )
            .prop_map(|(kind, url, preview_width)| {
                BlockKind::media(
                    kind,
                    MediaProps {
                        url,
                        preview_width,
                        ..MediaProps::default()
                    },
                )
            }),
    ]
}

#[derive(Debug, Clone)]
struct Shape {
    kind: BlockKind,
    children: Vec<Shape>,
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = kind().prop_map(|kind| Shape {
        kind,
        children: Vec::new(),
    });
    leaf.prop_recursive(3, 24, 4, |inner| {
        (kind(), prop::collection::vec(inner, 0..4))
            .prop_map(|(kind, children)| Shape { kind, children })
    })
}

// Ids are assigned after generation so they stay unique across the tree.
fn build(shapes: Vec<Shape>, next: &Cell<usize>) -> Vec<Block> {
    shapes
        .into_iter()
        .map(|shape| {
            let id = format!("blk-{}", next.get());
            next.set(next.get() + 1);
            Block::new(shape.kind)
                .with_id(id)
                .with_children(build(shape.children, next))
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_snapshot_round_trip(shapes in prop::collection::vec(shape(), 0..5)) {
        let tree = BlockTree::from_blocks(build(shapes, &Cell::new(0)));

        let json = to_snapshot(&tree).unwrap();
        let back = parse_snapshot(&json).unwrap();

        prop_assert_eq!(&back, &tree);
        prop_assert_eq!(to_snapshot(&back).unwrap(), json);
    }
}
