//! 거래 세션 분류기.
//!
//! 임의의 시각을 거래소 현지 시간(기준 시간대)으로 변환한 뒤
//! 시각(time-of-day)만으로 네 가지 세션 중 하나로 분류합니다.
//!
//! ```text
//!  00:00        07:00          09:30          16:00        17:00        24:00
//!    │  Closed    │  PreMarket   │ RegularHours │ AfterHours │  Closed    │
//! ```
//!
//! 각 세션은 `[시작, 종료)` 반구간입니다. 날짜(주말/공휴일)는 보지 않습니다.

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SessionConfig;
use crate::error::{CoreError, CoreResult};

/// 경계 시각 파싱 형식.
const TIME_LAYOUT: &str = "%H:%M:%S";

/// 거래 세션 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// 프리마켓
    PreMarket,
    /// 정규장
    RegularHours,
    /// 애프터마켓
    AfterHours,
    /// 장 마감 (야간 포함)
    Closed,
}

impl SessionState {
    /// 장 마감 상태인지 확인합니다.
    pub fn is_closed(&self) -> bool {
        matches!(self, SessionState::Closed)
    }

    /// 화면 표시용 이름.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::PreMarket => "Pre-market hours",
            SessionState::RegularHours => "Market hours",
            SessionState::AfterHours => "After-market hours",
            SessionState::Closed => "Overnight hours",
        }
    }

    /// 기계 판독용 코드.
    pub fn code(&self) -> &'static str {
        match self {
            SessionState::PreMarket => "pre_market",
            SessionState::RegularHours => "regular_hours",
            SessionState::AfterHours => "after_hours",
            SessionState::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 현재 세션 조회 트레잇.
///
/// 캐시 엔진은 이 트레잇을 통해 현재 세션을 조회하므로
/// 테스트에서 고정된 세션으로 대체할 수 있습니다.
pub trait SessionSource: Send + Sync {
    /// 현재 시각의 세션.
    fn current_session(&self) -> SessionState;
}

/// 하루 세션 경계 (기준 시간대의 시각).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSchedule {
    pub pre_market_start: NaiveTime,
    pub market_start: NaiveTime,
    pub market_end: NaiveTime,
    pub after_market_end: NaiveTime,
}

impl SessionSchedule {
    /// 시각 문자열에서 경계를 생성합니다.
    ///
    /// 경계는 엄격하게 증가해야 합니다.
    pub fn parse(
        pre_market_start: &str,
        market_start: &str,
        market_end: &str,
        after_market_end: &str,
    ) -> CoreResult<Self> {
        let schedule = Self {
            pre_market_start: parse_boundary("pre_market_start", pre_market_start)?,
            market_start: parse_boundary("market_start", market_start)?,
            market_end: parse_boundary("market_end", market_end)?,
            after_market_end: parse_boundary("after_market_end", after_market_end)?,
        };

        if !(schedule.pre_market_start < schedule.market_start
            && schedule.market_start < schedule.market_end
            && schedule.market_end < schedule.after_market_end)
        {
            return Err(CoreError::Config(format!(
                "세션 경계가 순서대로 증가하지 않음: {} < {} < {} < {}",
                pre_market_start, market_start, market_end, after_market_end
            )));
        }

        Ok(schedule)
    }

    /// 시각을 세션으로 분류합니다.
    pub fn classify_time(&self, time: NaiveTime) -> SessionState {
        if time < self.pre_market_start || time >= self.after_market_end {
            SessionState::Closed
        } else if time < self.market_start {
            SessionState::PreMarket
        } else if time < self.market_end {
            SessionState::RegularHours
        } else {
            SessionState::AfterHours
        }
    }
}

fn parse_boundary(name: &str, value: &str) -> CoreResult<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_LAYOUT).map_err(|e| {
        CoreError::Config(format!("세션 경계 파싱 실패 ({} = {:?}): {}", name, value, e))
    })
}

fn parse_timezone(name: &str) -> CoreResult<Tz> {
    name.parse::<Tz>()
        .map_err(|e| CoreError::Config(format!("시간대 해석 실패 ({}): {}", name, e)))
}

/// 거래 세션 분류기.
///
/// 생성 후에는 상태가 바뀌지 않으므로 `Arc`로 자유롭게 공유합니다.
#[derive(Debug, Clone)]
pub struct SessionClassifier {
    reference_tz: Tz,
    display_tz: Tz,
    schedule: SessionSchedule,
}

impl SessionClassifier {
    /// 설정에서 분류기를 생성합니다.
    ///
    /// # Errors
    /// 시간대를 해석할 수 없거나 경계 시각이 잘못되면 `CoreError::Config`.
    pub fn new(config: &SessionConfig) -> CoreResult<Self> {
        let reference_tz = parse_timezone(&config.timezone)?;
        let display_tz = parse_timezone(&config.display_timezone)?;
        let schedule = SessionSchedule::parse(
            &config.pre_market_start,
            &config.market_start,
            &config.market_end,
            &config.after_market_end,
        )?;

        tracing::debug!(
            timezone = %reference_tz,
            pre_market_start = %schedule.pre_market_start,
            market_start = %schedule.market_start,
            market_end = %schedule.market_end,
            after_market_end = %schedule.after_market_end,
            "세션 분류기 생성"
        );

        Ok(Self {
            reference_tz,
            display_tz,
            schedule,
        })
    }

    /// 기준 시간대.
    pub fn reference_tz(&self) -> Tz {
        self.reference_tz
    }

    /// 세션 경계.
    pub fn schedule(&self) -> &SessionSchedule {
        &self.schedule
    }

    /// 시각을 기준 시간대로 변환합니다.
    pub fn to_reference<T: TimeZone>(&self, instant: &DateTime<T>) -> DateTime<Tz> {
        instant.with_timezone(&self.reference_tz)
    }

    /// 시각을 표시용 시간대로 변환합니다.
    pub fn to_display<T: TimeZone>(&self, instant: &DateTime<T>) -> DateTime<Tz> {
        instant.with_timezone(&self.display_tz)
    }

    /// 시각을 세션으로 분류합니다.
    ///
    /// 호출자의 시간대와 관계없이 기준 시간대의 벽시계 시각으로 비교합니다.
    pub fn classify<T: TimeZone>(&self, instant: &DateTime<T>) -> SessionState {
        self.schedule
            .classify_time(self.to_reference(instant).time())
    }
}

impl SessionSource for SessionClassifier {
    fn current_session(&self) -> SessionState {
        self.classify(&Utc::now())
    }
}
