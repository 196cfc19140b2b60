//! Prompt fragments shared by every extractor.

/// Formatting rules appended to every extractor's system prompt.
pub const GLOBAL_RULES: &str = "\
GLOBAL FORMATTING RULES (every field, no exceptions):
- Dates are MM/DD/YY (e.g. \"08/26/24\"). Convert any other format.
- Times are 12-hour with AM/PM (e.g. \"4:40 PM\"). Convert 24-hour times.
- Missing fields: leave the key out of the object entirely.
  Never emit null, \"N/A\", or an empty string.
- Currency amounts: copy the figure exactly as printed on the invoice.
  Only convert when the schema explicitly asks for a {home_currency} amount.
- Output only the JSON array described by the schema. No prose, no code fences.";

/// Instructions for recording a foreign-currency conversion in agentRemarks.
pub const CONVERSION_REMARKS: &str = "\
If the invoice is NOT in {home_currency}, convert the base amount to {home_currency} (use the live rate
supplied with the invoice when present) and fill agentRemarks with:
  DEPOSIT PAID: $[{home_currency} amount] {home_currency}
  COMMISSION: [raw amount] [currency]
  Invoiced in [currency] by Supplier
  Amounts in CB Converted to {home_currency} on [MM/DD/YY] @ rate of 1 [currency] : [rate] {home_currency}";

/// Marker in prompt text replaced by the configured home currency.
pub const HOME_CURRENCY_SLOT: &str = "{home_currency}";

/// Closing line of every system prompt.
pub const ARRAY_ONLY: &str = "Return ONLY the JSON array. No prose, no markdown fences.";

/// Fill the home currency into an assembled prompt.
pub(crate) fn with_home_currency(prompt: &str, home_currency: &str) -> String {
    prompt.replace(HOME_CURRENCY_SLOT, home_currency)
}

/// Join prompt parts with blank lines, skipping empty ones.
pub(crate) fn assemble(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_skips_blank_parts() {
        assert_eq!(assemble(&["a", "", "  ", "b\n"]), "a\n\nb");
    }

    #[test]
    fn test_home_currency_fills_every_slot() {
        let prompt = with_home_currency(CONVERSION_REMARKS, "USD");

        assert!(prompt.starts_with("If the invoice is NOT in USD, convert the base amount to USD"));
        assert!(prompt.contains("@ rate of 1 [currency] : [rate] USD"));
        assert!(!prompt.contains(HOME_CURRENCY_SLOT));
        assert!(!prompt.contains("CAD"));
    }
}
