//! Bounding rectangle rules

use super::on_screen;
use crate::condition::Condition;
use crate::rule::{Evaluation, Outcome, Rule, RuleCategory, Standard};
use crate::types::{ControlType, PropertyId};

/// Largest plausible width or height, in pixels
pub const MAX_DIMENSION: i32 = 20_000;

fn has_rect() -> Condition {
    Condition::exists(PropertyId::BoundingRectangle)
}

pub fn rules() -> Vec<Rule> {
    vec![
        Rule::check(
            "BoundingRectangleNotNull",
            Condition::is_true(PropertyId::IsControlElement) & on_screen(),
            Outcome::Fail,
            |e| Ok(e.property(PropertyId::BoundingRectangle).is_some()),
        )
        .with_description("An on-screen control element must have a BoundingRectangle.")
        .with_how_to_fix("Expose the element's screen location so magnifiers and touch can find it.")
        .with_standard(Standard::InfoAndRelationships)
        .with_category(RuleCategory::Geometry)
        .with_property(PropertyId::BoundingRectangle),

        Rule::check(
            "BoundingRectangleNotAllZeros",
            has_rect() & on_screen(),
            Outcome::Fail,
            |e| Ok(!e.require_rect()?.is_all_zeros()),
        )
        .with_description("The BoundingRectangle of an on-screen element must not be all zeros.")
        .with_how_to_fix("Report the real location of the {control_type}, or mark it offscreen.")
        .with_standard(Standard::InfoAndRelationships)
        .with_category(RuleCategory::Geometry)
        .with_property(PropertyId::BoundingRectangle),

        Rule::new("BoundingRectangleSizeReasonable", has_rect() & on_screen(), |e| {
            let rect = e.require_rect()?;
            if rect.is_all_zeros() {
                // reported by BoundingRectangleNotAllZeros
                return Ok(Evaluation::not_applicable());
            }
            let (w, h) = (rect.width(), rect.height());
            let ok = w > 0 && h > 0 && w <= MAX_DIMENSION && h <= MAX_DIMENSION;
            Ok(Evaluation::pass_or(
                ok,
                Outcome::Fail,
                format!("Unreasonable size {}x{} for {}", w, h, rect),
            ))
        })
        .with_description("The BoundingRectangle must have a positive, plausible width and height.")
        .with_how_to_fix("Fix the layout so the {control_type} reports its real size.")
        .with_standard(Standard::InfoAndRelationships)
        .with_category(RuleCategory::Geometry)
        .with_property(PropertyId::BoundingRectangle),

        Rule::new(
            "BoundingRectangleContainedInParent",
            has_rect() & on_screen() & Condition::on_parent(has_rect()),
            |e| {
                let rect = e.require_rect()?;
                let Some(parent) = e.parent() else {
                    return Ok(Evaluation::not_applicable());
                };
                let parent_rect = parent.require_rect()?;
                if rect.is_all_zeros() || parent_rect.is_all_zeros() {
                    return Ok(Evaluation::not_applicable());
                }
                Ok(Evaluation::pass_or(
                    parent_rect.contains(&rect),
                    Outcome::Fail,
                    format!("{} lies outside its parent {}", rect, parent_rect),
                ))
            },
        )
        .with_description("An element's BoundingRectangle must lie within its parent's.")
        .with_how_to_fix("Make sure the {control_type} is laid out inside its container.")
        .with_standard(Standard::InfoAndRelationships)
        .with_category(RuleCategory::Geometry)
        .with_property(PropertyId::BoundingRectangle),

        Rule::check(
            "BoundingRectangleOnWPFTextParent",
            Condition::control_type(ControlType::Text)
                & Condition::on_parent(Condition::equals(PropertyId::FrameworkId, "WPF")),
            Outcome::Fail,
            |e| Ok(!e.require_rect()?.is_empty()),
        )
        .with_description("A WPF text element must have a non-empty BoundingRectangle.")
        .with_how_to_fix("Give the WPF text a size, or remove it from the control view.")
        .with_standard(Standard::InfoAndRelationships)
        .with_category(RuleCategory::Geometry)
        .with_property(PropertyId::BoundingRectangle),
    ]
}
