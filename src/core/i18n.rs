//! Message catalogue for user-facing labels.
//!
//! Keys are the English source phrases. `{0}` placeholders are filled by
//! [`Translator::t_with`]. Unknown keys render as the key itself.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

const EN: &[(&str, &str)] = &[
    ("sth list", "{0} List"),
    ("create sth", "Create {0}"),
    ("sth created", "{0} created"),
    ("create sth failed", "Failed to create {0}"),
    ("api token", "API Token"),
    ("create", "Create"),
    ("copy", "Copy"),
    ("copied to clipboard", "copied to clipboard"),
    ("copy failed", "Copy failed"),
    (
        "api token only show once time tips",
        "This API token is only shown once. Copy it now and keep it safe.",
    ),
    ("name", "Name"),
    ("scopes", "Scopes"),
    ("description", "Description"),
    ("last_used_at", "Last Used"),
    ("expired_at", "Expires"),
    ("created_at", "Created"),
    ("creator", "Creator"),
    ("loading", "Loading..."),
    ("no data", "No API tokens yet. Press c to create one."),
    ("submit", "Submit"),
    ("submitting", "Submitting..."),
    ("refresh failed", "Failed to refresh list"),
];

const ZH: &[(&str, &str)] = &[
    ("sth list", "{0}列表"),
    ("create sth", "创建{0}"),
    ("sth created", "{0}已创建"),
    ("create sth failed", "创建{0}失败"),
    ("api token", "API 令牌"),
    ("create", "创建"),
    ("copy", "复制"),
    ("copied to clipboard", "已复制到剪贴板"),
    ("copy failed", "复制失败"),
    (
        "api token only show once time tips",
        "API 令牌只显示一次，请立即复制并妥善保存。",
    ),
    ("name", "名称"),
    ("scopes", "权限范围"),
    ("description", "描述"),
    ("last_used_at", "最后使用时间"),
    ("expired_at", "过期时间"),
    ("created_at", "创建时间"),
    ("creator", "创建者"),
    ("loading", "加载中..."),
    ("no data", "暂无 API 令牌，按 c 创建。"),
    ("submit", "提交"),
    ("submitting", "提交中..."),
    ("refresh failed", "刷新列表失败"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    locale: Locale,
}

impl Translator {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        let table = match self.locale {
            Locale::En => EN,
            Locale::Zh => ZH,
        };
        table
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or(key)
    }

    /// Translate `key` and substitute positional `{n}` placeholders.
    pub fn t_with(&self, key: &str, args: &[&str]) -> String {
        args.iter()
            .enumerate()
            .fold(self.t(key).to_string(), |text, (i, arg)| {
                text.replace(&format!("{{{i}}}"), arg)
            })
    }
}
