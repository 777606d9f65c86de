//! 業種語彙モジュール
//!
//! 分類結果は必ずこの語彙のいずれか（企業名が空の行のみ UNKNOWN_LABEL）。
//! AIの回答は次の優先順位で語彙に解決する:
//! 1. 完全一致
//! 2. 大文字小文字を無視した一致（語彙側の表記を返す）
//! 3. 既定ラベル（語彙の先頭）

/// 業種一覧（この順序で既定ラベルが決まる）
pub const INDUSTRIES: &[&str] = &[
    "FSI",
    "Retail",
    "Manufacturing",
    "Utilities",
    "Transportation",
    "Conglomerate",
    "Government",
    "Telco",
    "Healthcare",
    "Aviation",
    "Defence",
];

/// 企業名が空の行に付けるラベル
pub const UNKNOWN_LABEL: &str = "Unknown";

/// 回答がどのように語彙へ解決されたか
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelMatch {
    /// 完全一致
    Exact,
    /// 大文字小文字違いで一致
    CaseInsensitive,
    /// 一致なし。既定ラベルに置き換えた
    Fallback { reply: String },
}

/// 語彙への解決結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub label: String,
    pub matched: LabelMatch,
}

impl Resolution {
    pub fn is_fallback(&self) -> bool {
        matches!(self.matched, LabelMatch::Fallback { .. })
    }
}

/// 閉じた業種語彙
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    labels: Vec<String>,
}

impl Vocabulary {
    /// 組み込みの業種語彙
    pub fn industries() -> Self {
        Self {
            labels: INDUSTRIES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// 一致しない回答の置き換え先（語彙の先頭）
    pub fn default_label(&self) -> &str {
        &self.labels[0]
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// AIの回答を語彙のラベルに解決
    pub fn resolve(&self, reply: &str) -> Resolution {
        let trimmed = reply.trim();

        if let Some(label) = self.labels.iter().find(|l| l.as_str() == trimmed) {
            return Resolution {
                label: label.clone(),
                matched: LabelMatch::Exact,
            };
        }

        let lower = trimmed.to_lowercase();
        if let Some(label) = self.labels.iter().find(|l| l.to_lowercase() == lower) {
            return Resolution {
                label: label.clone(),
                matched: LabelMatch::CaseInsensitive,
            };
        }

        Resolution {
            label: self.default_label().to_string(),
            matched: LabelMatch::Fallback {
                reply: trimmed.to_string(),
            },
        }
    }

    /// プロンプト用のカンマ区切り一覧
    pub fn joined(&self) -> String {
        self.labels.join(", ")
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::industries()
    }
}
