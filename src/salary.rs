use crate::models::Salary;

/// Human-readable salary such as `от 100000 до 150000 RUR`.
///
/// Zero bounds and a blank currency count as absent. Returns `None` when
/// nothing is left to show.
pub fn normalize(salary: Option<&Salary>) -> Option<String> {
    let salary = salary?;

    let mut parts = Vec::new();
    if let Some(from) = salary.from.filter(|v| *v > 0) {
        parts.push(format!("от {from}"));
    }
    if let Some(to) = salary.to.filter(|v| *v > 0) {
        parts.push(format!("до {to}"));
    }
    if let Some(currency) = salary.currency.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        parts.push(currency.to_uppercase());
    }

    (!parts.is_empty()).then(|| parts.join(" "))
}
