//! Prompt catalog: built-in shortcut templates and user prompts.
//!
//! Built-in prompts are generated from a localized template table keyed by
//! `(prompt id, prompt locale)`. They are never deleted, only toggled
//! enabled/disabled; user prompts are free-form and stored verbatim in
//! settings. Template text carries a `{lang}` placeholder that is replaced
//! with the target language's native name at render time.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::languages::{native_name, prompt_locale};

/// A named instruction applied to page content to produce an AI
/// transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub name: String,
    pub content: String,
    pub target_language: String,
    pub enabled: bool,
    pub is_system: bool,
    /// Unix milliseconds.
    pub created_at: i64,
    /// Unix milliseconds.
    pub updated_at: i64,
}

impl Prompt {
    /// Renders the instruction text with `{lang}` replaced by the target
    /// language's native name.
    pub fn render(&self) -> String {
        self.content.replace("{lang}", native_name(&self.target_language))
    }
}

/// Built-in prompt ids, in display order.
pub const BUILTIN_PROMPT_IDS: &[&str] = &[
    "builtin_summarize",
    "builtin_translate",
    "builtin_bilingual",
    "builtin_key_points",
    "builtin_action_items",
    "builtin_explain",
];

/// Returns whether an id belongs to the fixed built-in set.
pub fn is_builtin(id: &str) -> bool {
    BUILTIN_PROMPT_IDS.contains(&id)
}

struct Template {
    id: &'static str,
    locale: &'static str,
    name: &'static str,
    content: &'static str,
}

// Localized built-in templates. English is always present; zh/ja/es carry
// translations and every other locale falls back to English.
const TEMPLATES: &[Template] = &[
    Template {
        id: "builtin_summarize",
        locale: "en",
        name: "Summarize",
        content: "You are a careful article summarization assistant. Produce a summary that:\n\n\
            1. Covers the main ideas and key information\n\
            2. Stays objective, with no opinions of your own\n\
            3. Uses a clear structure and concise language\n\
            4. Is no longer than half the original text\n\n\
            Respond in {lang}.",
    },
    Template {
        id: "builtin_summarize",
        locale: "zh",
        name: "总结",
        content: "你是一位严谨的文章摘要助手。请生成满足以下要求的摘要：\n\n\
            1. 覆盖主要观点和关键信息\n\
            2. 保持客观，不加入个人观点\n\
            3. 结构清晰，语言简洁\n\
            4. 长度不超过原文一半\n\n\
            请使用{lang}回复。",
    },
    Template {
        id: "builtin_summarize",
        locale: "ja",
        name: "要約",
        content: "あなたは丁寧な記事要約アシスタントです。次の条件を満たす要約を作成してください：\n\n\
            1. 主要な論点と重要な情報を含める\n\
            2. 客観的に書き、意見を加えない\n\
            3. 構成を明確に、簡潔な言葉で\n\
            4. 元の文章の半分以下の長さにする\n\n\
            {lang}で回答してください。",
    },
    Template {
        id: "builtin_summarize",
        locale: "es",
        name: "Resumir",
        content: "Eres un asistente meticuloso de resumen de artículos. Genera un resumen que:\n\n\
            1. Cubra las ideas principales y la información clave\n\
            2. Se mantenga objetivo, sin opiniones propias\n\
            3. Use una estructura clara y un lenguaje conciso\n\
            4. No supere la mitad del texto original\n\n\
            Responde en {lang}.",
    },
    Template {
        id: "builtin_translate",
        locale: "en",
        name: "Translate",
        content: "You are a professional translator. Translate the article so that it:\n\n\
            1. Preserves the original meaning and style\n\
            2. Uses idiomatic, natural phrasing\n\
            3. Translates technical terms accurately\n\
            4. Keeps the original paragraph structure\n\n\
            Respond in {lang}.",
    },
    Template {
        id: "builtin_translate",
        locale: "zh",
        name: "翻译",
        content: "你是一位专业译者。请按以下要求翻译文章：\n\n\
            1. 保留原文的含义和风格\n\
            2. 使用地道自然的表达\n\
            3. 准确翻译专业术语\n\
            4. 保持原文的段落结构\n\n\
            请使用{lang}回复。",
    },
    Template {
        id: "builtin_translate",
        locale: "ja",
        name: "翻訳",
        content: "あなたはプロの翻訳者です。次の条件で記事を翻訳してください：\n\n\
            1. 原文の意味と文体を保つ\n\
            2. 自然で慣用的な表現を使う\n\
            3. 専門用語を正確に訳す\n\
            4. 元の段落構成を維持する\n\n\
            {lang}で回答してください。",
    },
    Template {
        id: "builtin_translate",
        locale: "es",
        name: "Traducir",
        content: "Eres un traductor profesional. Traduce el artículo de modo que:\n\n\
            1. Conserve el significado y el estilo originales\n\
            2. Use expresiones naturales e idiomáticas\n\
            3. Traduzca con precisión los términos técnicos\n\
            4. Mantenga la estructura de párrafos original\n\n\
            Responde en {lang}.",
    },
    Template {
        id: "builtin_bilingual",
        locale: "en",
        name: "Bilingual Translation",
        content: "Translate the following Markdown document into {lang} in a paragraph-by-paragraph \
            comparison format:\n\n\
            1. Keep every original paragraph, and add its translation right after it\n\
            2. Preserve heading levels, list markers, indentation, and code blocks\n\
            3. Leave code, commands, paths, and images unchanged; translate only comments inside code\n\
            4. Do not split original paragraphs across multiple lines",
    },
    Template {
        id: "builtin_bilingual",
        locale: "zh",
        name: "双语对照",
        content: "请将以下 Markdown 文档翻译成{lang}，采用逐段对照的格式：\n\n\
            1. 保留每个原文段落，并在其后紧跟对应翻译\n\
            2. 保持标题层级、列表符号、缩进和代码块不变\n\
            3. 代码、命令、路径和图片保持原样，只翻译代码中的注释\n\
            4. 不要把原文段落拆成多行",
    },
    Template {
        id: "builtin_key_points",
        locale: "en",
        name: "Key Points",
        content: "Extract the main ideas from the article as a bullet list:\n\n\
            1. 5-10 points in concise language\n\
            2. Each point a complete statement\n\
            3. Ordered by importance\n\
            4. No opinions or interpretation of your own\n\n\
            Respond in {lang}.",
    },
    Template {
        id: "builtin_key_points",
        locale: "zh",
        name: "要点",
        content: "请以列表形式提取文章的要点：\n\n\
            1. 用简洁语言提取 5-10 条\n\
            2. 每条是完整的陈述\n\
            3. 按重要性排序\n\
            4. 不加入个人观点或解读\n\n\
            请使用{lang}回复。",
    },
    Template {
        id: "builtin_key_points",
        locale: "ja",
        name: "要点",
        content: "記事の要点を箇条書きで抽出してください：\n\n\
            1. 簡潔な言葉で5〜10項目\n\
            2. 各項目は完結した文にする\n\
            3. 重要度順に並べる\n\
            4. 意見や解釈を加えない\n\n\
            {lang}で回答してください。",
    },
    Template {
        id: "builtin_action_items",
        locale: "en",
        name: "Actions",
        content: "Extract the actionable items from the article:\n\n\
            1. List every executable task or recommendation mentioned\n\
            2. Start each item with a verb\n\
            3. Arrange in logical execution order\n\
            4. Mark priority (High/Medium/Low) where possible\n\n\
            Respond in {lang}.",
    },
    Template {
        id: "builtin_action_items",
        locale: "zh",
        name: "行动项",
        content: "请提取文章中的可执行事项：\n\n\
            1. 列出提到的每个可执行任务或建议\n\
            2. 每项以动词开头\n\
            3. 按合理的执行顺序排列\n\
            4. 如有可能，标注优先级（高/中/低）\n\n\
            请使用{lang}回复。",
    },
    Template {
        id: "builtin_explain",
        locale: "en",
        name: "Explain",
        content: "Explain the technical content of the article in depth:\n\n\
            1. Break complex concepts down into plain terms\n\
            2. Supply relevant background knowledge\n\
            3. Relate the technologies involved to each other\n\
            4. Clarify anything ambiguous in the original\n\n\
            Respond in {lang}.",
    },
    Template {
        id: "builtin_explain",
        locale: "zh",
        name: "解释",
        content: "请深入解释文章中的技术内容：\n\n\
            1. 用通俗的语言拆解复杂概念\n\
            2. 补充相关背景知识\n\
            3. 说明所涉及技术之间的关系\n\
            4. 澄清原文中含糊的部分\n\n\
            请使用{lang}回复。",
    },
];

/// Looks up the localized name and content for a built-in prompt.
///
/// Falls back to the English template when the locale has no translation, and
/// to an empty template for unknown ids.
pub fn localized_template(id: &str, target_language: &str) -> (String, String) {
    let locale = prompt_locale(target_language);

    let found = TEMPLATES
        .iter()
        .find(|t| t.id == id && t.locale == locale)
        .or_else(|| TEMPLATES.iter().find(|t| t.id == id && t.locale == "en"));

    match found {
        Some(t) => (t.name.to_string(), t.content.to_string()),
        None => ("Unknown".to_string(), String::new()),
    }
}

/// Regenerates the built-in prompts localized for a target language.
///
/// All built-ins come back enabled; callers overlay the persisted
/// enabled/disabled state afterwards.
pub fn system_prompts(target_language: &str) -> Vec<Prompt> {
    let now = now_millis();
    BUILTIN_PROMPT_IDS
        .iter()
        .map(|id| {
            let (name, content) = localized_template(id, target_language);
            Prompt {
                id: (*id).to_string(),
                name,
                content,
                target_language: target_language.to_string(),
                enabled: true,
                is_system: true,
                created_at: now,
                updated_at: now,
            }
        })
        .collect()
}

/// Current wall-clock time in unix milliseconds.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
