//! JSX attribute canonicalization.
//!
//! Named attributes are sorted by case-insensitive name with a stable sort.
//! Spread attributes and namespaced attributes never move. Under
//! [`SpreadPolicy::Barrier`] a named attribute also never crosses a spread,
//! so sorting happens independently inside each run of attributes between
//! spreads.

use oxc_allocator::Vec as ArenaVec;
use oxc_ast::ast::{JSXAttributeItem, JSXAttributeName};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpreadPolicy {
    /// Spreads split the attribute list into independently sorted segments.
    #[default]
    Barrier,
    /// Spreads keep their slots but named attributes sort across them.
    Unrestricted,
}

/// How one attribute participates in ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSlot {
    Named(String),
    Fixed,
    Spread,
}

impl AttributeSlot {
    pub fn of(item: &JSXAttributeItem<'_>) -> Self {
        match item {
            JSXAttributeItem::Attribute(attr) => match &attr.name {
                JSXAttributeName::Identifier(id) => AttributeSlot::Named(id.name.to_string()),
                JSXAttributeName::NamespacedName(_) => AttributeSlot::Fixed,
            },
            JSXAttributeItem::SpreadAttribute(_) => AttributeSlot::Spread,
        }
    }
}

/// Compute the canonical order as a permutation: `order[i]` is the original
/// index of the attribute that belongs at position `i`.
pub fn canonical_order(slots: &[AttributeSlot], policy: SpreadPolicy) -> Vec<usize> {
    let mut order: Vec<usize> = (0..slots.len()).collect();

    let mut segment_start = 0;
    for (index, slot) in slots.iter().enumerate() {
        if *slot == AttributeSlot::Spread && policy == SpreadPolicy::Barrier {
            sort_segment(slots, segment_start..index, &mut order);
            segment_start = index + 1;
        }
    }
    sort_segment(slots, segment_start..slots.len(), &mut order);

    order
}

fn sort_segment(slots: &[AttributeSlot], range: std::ops::Range<usize>, order: &mut [usize]) {
    let positions: Vec<usize> = range
        .filter(|i| matches!(slots[*i], AttributeSlot::Named(_)))
        .collect();
    if positions.len() < 2 {
        return;
    }

    let mut keyed: Vec<(String, usize)> = positions
        .iter()
        .map(|i| match &slots[*i] {
            AttributeSlot::Named(name) => (name.to_lowercase(), *i),
            _ => unreachable!("positions only holds named slots"),
        })
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    for (position, (_, original)) in positions.iter().zip(keyed) {
        order[*position] = original;
    }
}

pub fn is_identity(order: &[usize]) -> bool {
    order.iter().enumerate().all(|(i, o)| i == *o)
}

/// Rearrange `items` so that `items[i]` becomes the old `items[order[i]]`.
pub fn permute_in_place<T>(items: &mut [T], order: &[usize]) {
    debug_assert_eq!(items.len(), order.len());
    for i in 0..order.len() {
        let mut source = order[i];
        while source < i {
            source = order[source];
        }
        items.swap(i, source);
    }
}

/// Reorder one opening tag's attributes. Returns whether anything moved.
pub fn canonicalize_attributes<'a>(
    attributes: &mut ArenaVec<'a, JSXAttributeItem<'a>>,
    policy: SpreadPolicy,
) -> bool {
    if attributes.len() < 2 {
        return false;
    }

    let slots: Vec<AttributeSlot> = attributes.iter().map(AttributeSlot::of).collect();
    let order = canonical_order(&slots, policy);
    if is_identity(&order) {
        return false;
    }

    permute_in_place(&mut attributes[..], &order);
    true
}
