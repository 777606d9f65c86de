//! プロンプト生成モジュール
//!
//! - SYSTEM_PROMPT: 分類器の役割を固定するシステム指示
//! - build_classification_prompt: 企業1社分のユーザープロンプト

use crate::vocabulary::Vocabulary;

/// システム指示（業種名のみを返させる）
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that classifies companies by industry. \
Always respond with only the industry name from the provided list.";

/// 業種分類プロンプト生成
///
/// # Arguments
/// * `company_name` - 企業名（前後の空白は除去済みであること）
/// * `vocabulary` - 選択肢となる業種語彙
///
/// # Returns
/// 語彙から1つだけ選ばせるプロンプト文字列
pub fn build_classification_prompt(company_name: &str, vocabulary: &Vocabulary) -> String {
    let industries = vocabulary.joined();

    format!(
        r#"Classify the following company into exactly one of these industries:
{industries}

Company name: {company_name}

Respond with ONLY the industry name from the list above, nothing else. If uncertain, choose the most likely industry based on the company name."#
    )
}
