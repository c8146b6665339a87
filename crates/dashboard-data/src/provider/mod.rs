//! 외부 데이터 제공자.
//!
//! - 차트 생성기: 외부 스크립트로 PNG 차트 생성
//! - 시세: Yahoo Finance quoteSummary
//! - 공포/탐욕 지수: 웹 페이지 스크래핑 및 고정 이미지 URL

pub mod chart_generator;
pub mod quote;
pub mod sentiment;

pub use chart_generator::{ChartGenerator, ScriptChartGenerator};
pub use quote::{snapshot_from_summary, QuoteProvider, QuoteSummaryResponse, YahooQuoteProvider};
pub use sentiment::{
    extract_needle_image_url, SentimentCategory, SentimentSource, WebSentimentSource,
};
