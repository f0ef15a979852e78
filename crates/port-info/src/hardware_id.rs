//! Vendor/product extraction from hardware identifiers
//!
//! A USB serial adapter reports hardware ids such as
//! `USB\VID_1A86&PID_7523&REV_0264`, most specific first. Only the first
//! id is inspected.

use once_cell::sync::Lazy;
use regex::Regex;

static HARDWARE_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)vid_(\w+)&pid_(\w+)|pid_(\w+)&vid_(\w+)")
        .expect("hardware id pattern is valid")
});

/// Which identifier to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSelector {
    /// The token after `VID_`
    Vendor,
    /// The token after `PID_`
    Product,
}

/// Extract the vendor or product token from the first hardware id
///
/// Matching is case-insensitive. An empty list or an id without both
/// markers yields an empty string.
pub fn parse_hardware_id(selector: IdSelector, hardware_ids: &[String]) -> String {
    let Some(first) = hardware_ids.first() else {
        return String::new();
    };
    let Some(caps) = HARDWARE_ID_PATTERN.captures(first) else {
        return String::new();
    };

    // Groups 1/2 for VID-then-PID, 4/3 for PID-then-VID
    let (vendor, product) = if caps.get(1).is_some() { (1, 2) } else { (4, 3) };
    let group = match selector {
        IdSelector::Vendor => vendor,
        IdSelector::Product => product,
    };
    caps.get(group)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Vendor token of the first hardware id
pub fn vendor_identifier(hardware_ids: &[String]) -> String {
    parse_hardware_id(IdSelector::Vendor, hardware_ids)
}

/// Product token of the first hardware id
pub fn product_identifier(hardware_ids: &[String]) -> String {
    parse_hardware_id(IdSelector::Product, hardware_ids)
}
