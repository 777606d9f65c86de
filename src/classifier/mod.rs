//! 業種分類モジュール
//!
//! 企業名1件ごとにAIへ問い合わせ、回答を業種語彙に解決する。
//! - API呼び出し自体の失敗はそのまま呼び出し元へ返す
//! - 語彙外の回答は警告を出して既定ラベルに置き換える

mod openai;

pub use openai::OpenAiClient;

use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use industry_tagger_common::{
    build_classification_prompt, LabelMatch, Resolution, Vocabulary, SYSTEM_PROMPT,
};

/// テキスト生成APIへのリクエスト
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// テキスト生成APIクライアント
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// 1回のリクエストに対する回答テキストを返す
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

pub struct IndustryClassifier<C> {
    client: C,
    vocabulary: Vocabulary,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl<C: CompletionClient> IndustryClassifier<C> {
    pub fn new(client: C, vocabulary: Vocabulary, config: &Config) -> Self {
        Self {
            client,
            vocabulary,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn build_request(&self, company_name: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            system: SYSTEM_PROMPT.to_string(),
            user: build_classification_prompt(company_name, &self.vocabulary),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// 企業名を業種に分類
    pub async fn classify(&self, company_name: &str) -> Result<Resolution> {
        let request = self.build_request(company_name);
        tracing::debug!(
            company = company_name,
            prompt_len = request.user.len(),
            "classification request"
        );

        let reply = self.client.complete(&request).await?;
        let resolution = self.vocabulary.resolve(&reply);

        match &resolution.matched {
            LabelMatch::Exact => {}
            LabelMatch::CaseInsensitive => {
                tracing::debug!(reply = reply.trim(), label = %resolution.label, "case-insensitive match");
            }
            LabelMatch::Fallback { reply } => {
                tracing::info!(reply = reply.as_str(), label = %resolution.label, "reply outside vocabulary");
            }
        }

        Ok(resolution)
    }
}

/// 語彙外の回答を既定ラベルに置き換えたときの警告文
///
/// 進捗行と同じ標準出力に表示する
pub fn fallback_warning(resolution: &Resolution) -> Option<String> {
    match &resolution.matched {
        LabelMatch::Fallback { reply } => Some(format!(
            "⚠ 回答 '{}' は業種一覧にないため '{}' とします",
            reply, resolution.label
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaggerError;
    use std::sync::Mutex;

    struct FixedReply {
        reply: String,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl FixedReply {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for FixedReply {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    struct Failing;

    #[async_trait]
    impl CompletionClient for Failing {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            Err(TaggerError::ClassifierApi("Error code: 500 - upstream".into()))
        }
    }

    fn classifier<C: CompletionClient>(client: C) -> IndustryClassifier<C> {
        IndustryClassifier::new(client, Vocabulary::industries(), &Config::default())
    }

    #[tokio::test]
    async fn test_exact_reply() {
        let c = classifier(FixedReply::new("Retail"));
        let r = c.classify("Corner Shop").await.unwrap();
        assert_eq!(r.label, "Retail");
        assert_eq!(r.matched, LabelMatch::Exact);
    }

    #[tokio::test]
    async fn test_reply_is_trimmed_and_recased() {
        let c = classifier(FixedReply::new("  telco \n"));
        let r = c.classify("Metro Mobile").await.unwrap();
        assert_eq!(r.label, "Telco");
        assert_eq!(r.matched, LabelMatch::CaseInsensitive);
    }

    #[tokio::test]
    async fn test_unexpected_reply_uses_default() {
        let c = classifier(FixedReply::new("Banking and insurance"));
        let r = c.classify("Acme Bank").await.unwrap();
        assert_eq!(r.label, "FSI");
        assert!(r.is_fallback());

        let warning = fallback_warning(&r).unwrap();
        assert!(warning.contains("Banking and insurance"));
        assert!(warning.contains("'FSI'"));
    }

    #[tokio::test]
    async fn test_no_warning_for_vocabulary_reply() {
        let c = classifier(FixedReply::new("retail"));
        let r = c.classify("Corner Shop").await.unwrap();
        assert_eq!(fallback_warning(&r), None);
    }

    #[tokio::test]
    async fn test_api_error_propagates() {
        let c = classifier(Failing);
        let err = c.classify("Acme Bank").await.unwrap_err();
        assert!(matches!(err, TaggerError::ClassifierApi(_)));
    }

    #[tokio::test]
    async fn test_request_settings() {
        let c = classifier(FixedReply::new("FSI"));
        c.classify("Acme Bank").await.unwrap();

        let requests = c.client().requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.max_tokens, 20);
        assert!((request.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(request.system, SYSTEM_PROMPT);
        assert!(request.user.contains("Company name: Acme Bank"));
    }
}
