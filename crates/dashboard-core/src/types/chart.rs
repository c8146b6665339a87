//! 차트 키와 기간/간격 토큰.
//!
//! 토큰 문자열은 차트 생성기에 그대로 전달되므로 외부 표기(`1mo`, `5d` 등)를
//! 그대로 유지합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 차트 조회 기간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartPeriod {
    #[serde(rename = "max")]
    Max,
    #[serde(rename = "10y")]
    Y10,
    #[serde(rename = "5y")]
    Y5,
    #[serde(rename = "2y")]
    Y2,
    #[serde(rename = "1y")]
    Y1,
    #[serde(rename = "6mo")]
    Mo6,
    #[serde(rename = "3mo")]
    Mo3,
    #[serde(rename = "1mo")]
    Mo1,
    #[serde(rename = "5d")]
    D5,
    #[serde(rename = "1d")]
    D1,
}

impl ChartPeriod {
    pub const ALL: [ChartPeriod; 10] = [
        ChartPeriod::Max,
        ChartPeriod::Y10,
        ChartPeriod::Y5,
        ChartPeriod::Y2,
        ChartPeriod::Y1,
        ChartPeriod::Mo6,
        ChartPeriod::Mo3,
        ChartPeriod::Mo1,
        ChartPeriod::D5,
        ChartPeriod::D1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartPeriod::Max => "max",
            ChartPeriod::Y10 => "10y",
            ChartPeriod::Y5 => "5y",
            ChartPeriod::Y2 => "2y",
            ChartPeriod::Y1 => "1y",
            ChartPeriod::Mo6 => "6mo",
            ChartPeriod::Mo3 => "3mo",
            ChartPeriod::Mo1 => "1mo",
            ChartPeriod::D5 => "5d",
            ChartPeriod::D1 => "1d",
        }
    }
}

impl fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartPeriod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::InvalidInput(format!("알 수 없는 기간: {}", s)))
    }
}

/// 갱신 주기 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshClass {
    /// 분봉 (짧은 주기로 갱신)
    Short,
    /// 시간봉 이상 (긴 주기로 갱신)
    Long,
}

/// 차트 캔들 간격.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartInterval {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "5d")]
    D5,
    #[serde(rename = "1wk")]
    W1,
    #[serde(rename = "1mo")]
    Mo1,
    #[serde(rename = "3mo")]
    Mo3,
}

impl ChartInterval {
    pub const ALL: [ChartInterval; 9] = [
        ChartInterval::M1,
        ChartInterval::M5,
        ChartInterval::M30,
        ChartInterval::H1,
        ChartInterval::D1,
        ChartInterval::D5,
        ChartInterval::W1,
        ChartInterval::Mo1,
        ChartInterval::Mo3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartInterval::M1 => "1m",
            ChartInterval::M5 => "5m",
            ChartInterval::M30 => "30m",
            ChartInterval::H1 => "1h",
            ChartInterval::D1 => "1d",
            ChartInterval::D5 => "5d",
            ChartInterval::W1 => "1wk",
            ChartInterval::Mo1 => "1mo",
            ChartInterval::Mo3 => "3mo",
        }
    }

    /// 갱신 주기 분류. 1분/5분봉만 짧은 주기입니다.
    pub fn refresh_class(&self) -> RefreshClass {
        match self {
            ChartInterval::M1 | ChartInterval::M5 => RefreshClass::Short,
            _ => RefreshClass::Long,
        }
    }

    pub fn is_short(&self) -> bool {
        self.refresh_class() == RefreshClass::Short
    }
}

impl fmt::Display for ChartInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartInterval {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| CoreError::InvalidInput(format!("알 수 없는 간격: {}", s)))
    }
}

/// 차트 캐시 키.
///
/// 심볼은 요청된 그대로(`^GSPC`) 보관하고, 파일명에서만 정규화합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartKey {
    pub symbol: String,
    pub period: ChartPeriod,
    pub interval: ChartInterval,
}

impl ChartKey {
    /// 새 키를 생성합니다.
    ///
    /// # Errors
    /// 심볼이 비어 있으면 `CoreError::InvalidInput`.
    pub fn new(
        symbol: impl Into<String>,
        period: ChartPeriod,
        interval: ChartInterval,
    ) -> Result<Self, CoreError> {
        let symbol = symbol.into().trim().to_string();
        if symbol.is_empty() {
            return Err(CoreError::InvalidInput("심볼이 비어 있음".to_string()));
        }
        Ok(Self {
            symbol,
            period,
            interval,
        })
    }

    /// 문자열 토큰에서 키를 생성합니다.
    pub fn parse(symbol: &str, period: &str, interval: &str) -> Result<Self, CoreError> {
        Self::new(symbol, period.parse()?, interval.parse()?)
    }

    /// 파일명에 쓰는 심볼.
    ///
    /// 앞의 `^` 하나를 제거하고 `[A-Za-z0-9._=-]` 밖의 문자는 `_`로 바꿉니다.
    pub fn sanitized_symbol(&self) -> String {
        let stripped = self.symbol.strip_prefix('^').unwrap_or(&self.symbol);
        stripped
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '=' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// 캐시 파일명: `{심볼}_{기간}_{간격}.png`.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}.png",
            self.sanitized_symbol(),
            self.period,
            self.interval
        )
    }

    pub fn refresh_class(&self) -> RefreshClass {
        self.interval.refresh_class()
    }
}

impl fmt::Display for ChartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.symbol, self.period, self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_symbol_file_name() {
        let key = ChartKey::parse("^GSPC", "1mo", "1d").unwrap();
        assert_eq!(key.file_name(), "GSPC_1mo_1d.png");
        assert_eq!(key.symbol, "^GSPC");
    }

    #[test]
    fn test_file_name_sanitizing() {
        let key = ChartKey::parse("ES=F", "5d", "5m").unwrap();
        assert_eq!(key.file_name(), "ES=F_5d_5m.png");

        let key = ChartKey::parse("../etc/passwd", "1d", "1m").unwrap();
        assert_eq!(key.file_name(), ".._etc_passwd_1d_1m.png");

        let key = ChartKey::parse("DX-Y.NYB", "1y", "1wk").unwrap();
        assert_eq!(key.file_name(), "DX-Y.NYB_1y_1wk.png");
    }

    #[test]
    fn test_refresh_class() {
        assert!(ChartInterval::M1.is_short());
        assert!(ChartInterval::M5.is_short());
        for interval in ["30m", "1h", "1d", "5d", "1wk", "1mo", "3mo"] {
            let parsed: ChartInterval = interval.parse().unwrap();
            assert_eq!(parsed.refresh_class(), RefreshClass::Long, "{}", interval);
        }
    }

    #[test]
    fn test_unknown_tokens() {
        assert!(matches!(
            "7m".parse::<ChartInterval>(),
            Err(CoreError::InvalidInput(_))
        ));
        assert!("3y".parse::<ChartPeriod>().is_err());
        assert!(ChartKey::parse("  ", "1d", "1m").is_err());
    }

    #[test]
    fn test_token_display() {
        for period in ChartPeriod::ALL {
            assert_eq!(period.to_string().parse::<ChartPeriod>().unwrap(), period);
        }
        assert_eq!(ChartInterval::W1.to_string(), "1wk");
    }
}
