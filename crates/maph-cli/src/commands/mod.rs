pub mod agenda;
pub mod consultation;
pub mod files;
pub mod patients;
pub mod profile;
pub mod requests;
pub mod session;

/// Prints `label: value`, skipping blank values.
pub(crate) fn field(label: &str, value: &str) {
    if !value.trim().is_empty() {
        println!("  {:<18} {}", format!("{}:", label), value);
    }
}
