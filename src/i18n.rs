// ==========================================
// Stock Ledger - i18n
// ==========================================
// rust-i18n, Brazilian Portuguese (default) and English.
// The rust_i18n::i18n! macro is invoked in lib.rs.
// ==========================================

/// Active locale
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Switch locale ("pt-BR" or "en")
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// Translate a key without arguments
///
/// # Example
/// ```no_run
/// use stock_ledger::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Translate a key, replacing `%{name}` placeholders
///
/// # Example
/// ```no_run
/// use stock_ledger::i18n::t_with_args;
/// let msg = t_with_args("import.sheet_not_found", &[("sheet", "PROGRAMA")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
