// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持法语（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use std::sync::Once;

/// 默认语言
pub const DEFAULT_LOCALE: &str = "fr";

static DEFAULT_LOCALE_INIT: Once = Once::new();

// rust-i18n 初始语言为 "en"，首次使用时切换到默认语言
fn ensure_default_locale() {
    DEFAULT_LOCALE_INIT.call_once(|| rust_i18n::set_locale(DEFAULT_LOCALE));
}

/// 获取当前语言
pub fn current_locale() -> String {
    ensure_default_locale();
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"fr" 或 "en"）
pub fn set_locale(locale: &str) {
    ensure_default_locale();
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use broker_crm::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    ensure_default_locale();
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use broker_crm::i18n::t_with_args;
/// let msg = t_with_args("import.missing_field", &[("field", "email")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    ensure_default_locale();
    interpolate(rust_i18n::t!(key).to_string(), args)
}

/// 按指定语言翻译（不改变全局语言）
pub fn t_in(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    interpolate(rust_i18n::t!(key, locale = locale).to_string(), args)
}

fn interpolate(mut message: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        message = message.replace(&placeholder, v);
    }
    message
}
