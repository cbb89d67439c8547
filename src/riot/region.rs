use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Platform routing values for Riot API (Summoner-v4, League-v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    BR1,
    LA1,
    LA2,
    NA1,
    JP1,
    KR,
    EUN1,
    EUW1,
    ME1,
    RU,
    TR1,
    OC1,
    PH2,
    SG2,
    TH2,
    TW2,
    VN2,
}

impl Platform {
    pub const ALL: [Platform; 17] = [
        Self::BR1,
        Self::LA1,
        Self::LA2,
        Self::NA1,
        Self::JP1,
        Self::KR,
        Self::EUN1,
        Self::EUW1,
        Self::ME1,
        Self::RU,
        Self::TR1,
        Self::OC1,
        Self::PH2,
        Self::SG2,
        Self::TH2,
        Self::TW2,
        Self::VN2,
    ];

    pub fn base_url(&self) -> String {
        format!("https://{}", self.host())
    }

    pub fn host(&self) -> &'static str {
        match self {
            Self::BR1 => "br1.api.riotgames.com",
            Self::LA1 => "la1.api.riotgames.com",
            Self::LA2 => "la2.api.riotgames.com",
            Self::NA1 => "na1.api.riotgames.com",
            Self::JP1 => "jp1.api.riotgames.com",
            Self::KR => "kr.api.riotgames.com",
            Self::EUN1 => "eun1.api.riotgames.com",
            Self::EUW1 => "euw1.api.riotgames.com",
            Self::ME1 => "me1.api.riotgames.com",
            Self::RU => "ru.api.riotgames.com",
            Self::TR1 => "tr1.api.riotgames.com",
            Self::OC1 => "oc1.api.riotgames.com",
            Self::PH2 => "ph2.api.riotgames.com",
            Self::SG2 => "sg2.api.riotgames.com",
            Self::TH2 => "th2.api.riotgames.com",
            Self::TW2 => "tw2.api.riotgames.com",
            Self::VN2 => "vn2.api.riotgames.com",
        }
    }

    /// Short region code as typed by users.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BR1 => "BR",
            Self::LA1 => "LAN",
            Self::LA2 => "LAS",
            Self::NA1 => "NA",
            Self::JP1 => "JP",
            Self::KR => "KR",
            Self::EUN1 => "EUNE",
            Self::EUW1 => "EUW",
            Self::ME1 => "ME",
            Self::RU => "RU",
            Self::TR1 => "TR",
            Self::OC1 => "OCE",
            Self::PH2 => "PH",
            Self::SG2 => "SG",
            Self::TH2 => "TH",
            Self::TW2 => "TW",
            Self::VN2 => "VN",
        }
    }

    pub fn to_region(self) -> Region {
        match self {
            Self::BR1 | Self::LA1 | Self::LA2 | Self::NA1 => Region::Americas,
            Self::JP1 | Self::KR => Region::Asia,
            Self::EUN1 | Self::EUW1 | Self::ME1 | Self::RU | Self::TR1 => Region::Europe,
            Self::OC1 | Self::PH2 | Self::SG2 | Self::TH2 | Self::TW2 | Self::VN2 => Region::Sea,
        }
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BR" | "BR1" => Ok(Self::BR1),
            "LAN" | "LA1" => Ok(Self::LA1),
            "LAS" | "LA2" => Ok(Self::LA2),
            "NA" | "NA1" => Ok(Self::NA1),
            "JP" | "JP1" => Ok(Self::JP1),
            "KR" => Ok(Self::KR),
            "EUNE" | "EUN" | "EUN1" => Ok(Self::EUN1),
            "EUW" | "EUW1" => Ok(Self::EUW1),
            "ME" | "ME1" => Ok(Self::ME1),
            "RU" => Ok(Self::RU),
            "TR" | "TR1" => Ok(Self::TR1),
            "OCE" | "OC" | "OC1" => Ok(Self::OC1),
            "PH" | "PH2" => Ok(Self::PH2),
            "SG" | "SG2" => Ok(Self::SG2),
            "TH" | "TH2" => Ok(Self::TH2),
            "TW" | "TW2" => Ok(Self::TW2),
            "VN" | "VN2" => Ok(Self::VN2),
            _ => Err(AppError::InvalidRegion(s.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Regional routing values for Riot API (Account-v1, Match-v5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Americas,
    Asia,
    Europe,
    Sea,
}

impl Region {
    pub fn base_url(&self) -> String {
        format!("https://{}", self.host())
    }

    pub fn host(&self) -> &'static str {
        match self {
            Self::Americas => "americas.api.riotgames.com",
            Self::Asia => "asia.api.riotgames.com",
            Self::Europe => "europe.api.riotgames.com",
            Self::Sea => "sea.api.riotgames.com",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Americas => "americas",
            Self::Asia => "asia",
            Self::Europe => "europe",
            Self::Sea => "sea",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Host serving account, summoner and league endpoints for a region code.
pub fn resolve_platform_host(code: &str) -> Result<&'static str, AppError> {
    Ok(code.parse::<Platform>()?.host())
}

/// Host serving match data for a region code.
pub fn resolve_routing_host(code: &str) -> Result<&'static str, AppError> {
    Ok(code.parse::<Platform>()?.to_region().host())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_platform_resolves_both_hosts() {
        for platform in Platform::ALL {
            let code = platform.code();
            let platform_host = resolve_platform_host(code).unwrap();
            let routing_host = resolve_routing_host(code).unwrap();

            assert!(!platform_host.is_empty(), "{code} has no platform host");
            assert!(!routing_host.is_empty(), "{code} has no routing host");
            assert_eq!(code.parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn codes_are_case_insensitive_and_accept_platform_ids() {
        assert_eq!("na".parse::<Platform>().unwrap(), Platform::NA1);
        assert_eq!("EUW1".parse::<Platform>().unwrap(), Platform::EUW1);
        assert_eq!(resolve_platform_host("NA").unwrap(), "na1.api.riotgames.com");
        assert_eq!(
            resolve_routing_host("NA").unwrap(),
            "americas.api.riotgames.com"
        );
        assert_eq!(resolve_routing_host("EUNE").unwrap(), "europe.api.riotgames.com");
        assert_eq!(resolve_routing_host("KR").unwrap(), "asia.api.riotgames.com");
        assert_eq!(resolve_routing_host("OCE").unwrap(), "sea.api.riotgames.com");
    }

    #[test]
    fn unknown_codes_are_rejected() {
        for code in ["", "XX", "AMERICAS", "na2"] {
            assert!(matches!(
                resolve_platform_host(code),
                Err(AppError::InvalidRegion(_))
            ));
            assert!(matches!(
                resolve_routing_host(code),
                Err(AppError::InvalidRegion(_))
            ));
        }
    }
}
