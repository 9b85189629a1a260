use clap::ValueEnum;

/// モデル呼び出し先
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AiProvider {
    /// OpenRouter へ実際に問い合わせる
    #[value(name = "openrouter", alias = "live")]
    OpenRouter,
    /// 固定の応答を返す（オフライン・テスト用）
    #[value(alias = "offline")]
    Canned,
}

impl AiProvider {
    pub fn name(&self) -> &'static str {
        match self {
            AiProvider::OpenRouter => "openrouter",
            AiProvider::Canned => "canned",
        }
    }

    /// ネットワーク呼び出しを伴うか
    pub fn is_live(&self) -> bool {
        matches!(self, AiProvider::OpenRouter)
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_enum_names_and_aliases() {
        assert_eq!(AiProvider::from_str("openrouter", true), Ok(AiProvider::OpenRouter));
        assert_eq!(AiProvider::from_str("live", true), Ok(AiProvider::OpenRouter));
        assert_eq!(AiProvider::from_str("canned", true), Ok(AiProvider::Canned));
        assert_eq!(AiProvider::from_str("offline", true), Ok(AiProvider::Canned));
        assert!(AiProvider::from_str("gemini", true).is_err());
    }

    #[test]
    fn test_is_live() {
        assert!(AiProvider::OpenRouter.is_live());
        assert!(!AiProvider::Canned.is_live());
        assert_eq!(AiProvider::Canned.to_string(), "canned");
    }
}
