//! 대시보드 페이지별 관심 종목.

/// 페이지 하나의 관심 종목 목록.
#[derive(Debug, Clone, Copy)]
pub struct Watchlist {
    /// 경로 이름 (`/api/pages/{name}`)
    pub name: &'static str,
    pub title: &'static str,
    pub symbols: &'static [&'static str],
}

pub const WATCHLISTS: &[Watchlist] = &[
    Watchlist {
        name: "index",
        title: "Market Indices",
        symbols: &[
            "^TNX", "DX-Y.NYB", "^VIX", "^GSPC", "^DJI", "^IXIC", "^RUT", "^KS11", "BTC-USD",
            "ETH-USD", "FNGU", "SOXL", "TQQQ", "UPRO", "URTY", "TECL", "LABU", "ICLN", "UVXY",
        ],
    },
    Watchlist {
        name: "etf",
        title: "ETF",
        symbols: &[
            "FNGU", "SOXL", "TQQQ", "UDOW", "UPRO", "URTY", "TECL", "LABU", "BNKU", "ICLN",
            "CURE", "KRBN", "JETS", "NRGU", "RETL", "DFEN", "KORU", "NAIL", "TPOR", "VTV", "DRN",
            "XLB", "DBB",
        ],
    },
    Watchlist {
        name: "faang",
        title: "FAANG",
        symbols: &[
            "GOOG", "FB", "AMZN", "AAPL", "NVDA", "TSLA", "NFLX", "BABA", "BIDU", "TWTR",
        ],
    },
    Watchlist {
        name: "semiconductor",
        title: "Semiconductor",
        symbols: &[
            "NVDA", "TXN", "AVGO", "QCOM", "INTC", "AMAT", "LRCX", "ASML", "ADI", "MU", "TSM",
            "TER",
        ],
    },
    Watchlist {
        name: "crypto",
        title: "Crypto Coins",
        symbols: &["BTC-USD", "ETH-USD", "DOGE-USD", "XRP-USD", "ADA-USD", "BNB-USD"],
    },
    Watchlist {
        name: "future",
        title: "Futures",
        symbols: &["YM=F", "ES=F", "NQ=F", "RTY=F"],
    },
    Watchlist {
        name: "growth",
        title: "Growth",
        symbols: &[
            "U", "PYPL", "PLTR", "DOCU", "SNAP", "TDOC", "ADBE", "ROKU", "SPOT", "ETSY", "ZG",
            "EXPE", "ABNB", "UBER", "DIS", "SNOW", "COIN", "AGC", "CHPT", "PAYC",
        ],
    },
    Watchlist {
        name: "basic",
        title: "Basic Materials",
        symbols: &[
            "DBB", "UCO", "UYM", "SLX", "NRGU", "CPER", "LIT", "TIMBER", "CORN", "DBA", "PICK",
        ],
    },
];

/// 이름으로 관심 종목 목록을 찾습니다.
pub fn find(name: &str) -> Option<&'static Watchlist> {
    WATCHLISTS.iter().find(|w| w.name == name)
}
