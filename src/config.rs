//! 환경 변수 기반 설정
//!
//! 시작 시 한 번만 읽어서 각 컴포넌트에 명시적으로 전달한다.

use std::env;
use std::time::Duration;

pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_AUCTION_INTERVAL: Duration = Duration::from_secs(5 * 60);
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// region:    --- Expiration Config
/// 경매 만료 스케줄러 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationConfig {
    /// 만료 검사 주기 (AUCTION_CHECK_INTERVAL)
    pub check_interval: Duration,
    /// 경매 유지 시간 (AUCTION_INTERVAL)
    pub auction_interval: Duration,
}

impl ExpirationConfig {
    /// 원시 설정 값에서 생성
    /// 값이 없거나 잘못된 경우 기본값을 사용한다.
    pub fn from_raw(check_interval: Option<&str>, auction_interval: Option<&str>) -> Self {
        Self {
            check_interval: parse_duration_or(check_interval, DEFAULT_CHECK_INTERVAL),
            auction_interval: parse_duration_or(auction_interval, DEFAULT_AUCTION_INTERVAL),
        }
    }
}

impl Default for ExpirationConfig {
    fn default() -> Self {
        Self {
            check_interval: DEFAULT_CHECK_INTERVAL,
            auction_interval: DEFAULT_AUCTION_INTERVAL,
        }
    }
}

/// "30s", "5m", "1h30m", "500ms" 형식의 기간 파싱
/// 비어 있거나 0 이거나 파싱에 실패하면 기본값
pub fn parse_duration_or(raw: Option<&str>, default: Duration) -> Duration {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| humantime::parse_duration(value).ok())
        .filter(|duration| !duration.is_zero())
        .unwrap_or(default)
}
// endregion: --- Expiration Config

// region:    --- Config
/// 서비스 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres 접속 URL, 없으면 메모리 저장소 사용
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub server_port: u16,
    pub expiration: ExpirationConfig,
}

impl Config {
    /// 환경 변수에서 설정 로드
    ///
    /// - `DATABASE_URL` (기본값: 없음)
    /// - `DATABASE_MAX_CONNECTIONS` (기본값: 5)
    /// - `SERVER_PORT` (기본값: 3000)
    /// - `AUCTION_CHECK_INTERVAL` (기본값: 30s)
    /// - `AUCTION_INTERVAL` (기본값: 5m)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            expiration: ExpirationConfig::from_raw(
                lookup("AUCTION_CHECK_INTERVAL").as_deref(),
                lookup("AUCTION_INTERVAL").as_deref(),
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            server_port: DEFAULT_SERVER_PORT,
            expiration: ExpirationConfig::default(),
        }
    }
}
// endregion: --- Config
