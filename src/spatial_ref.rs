use std::fmt::{self, Display, Formatter};

use crate::errors::*;

/// Coordinate reference system of a data object.
///
/// Only carries the identifying information the engine hands out: an EPSG
/// authority code, a WKT definition, or both. A default `Crs` is undefined.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Crs {
    epsg: Option<u32>,
    wkt: Option<String>,
}

impl Crs {
    pub fn undefined() -> Crs {
        Crs::default()
    }

    pub fn from_epsg(epsg_code: u32) -> Result<Crs> {
        if epsg_code == 0 {
            return Err(HelperError::BadArgument(
                "EPSG code must be positive".to_string(),
            ));
        }
        Ok(Crs {
            epsg: Some(epsg_code),
            wkt: None,
        })
    }

    pub fn from_wkt(wkt: &str) -> Result<Crs> {
        let wkt = wkt.trim();
        if wkt.is_empty() {
            return Err(HelperError::BadArgument("empty WKT definition".to_string()));
        }
        Ok(Crs {
            epsg: None,
            wkt: Some(wkt.to_string()),
        })
    }

    /// Attach an authority code to a WKT based definition.
    pub fn with_epsg(mut self, epsg_code: u32) -> Crs {
        if epsg_code > 0 {
            self.epsg = Some(epsg_code);
        }
        self
    }

    /// Returns `true` when the reference system is defined.
    pub fn is_okay(&self) -> bool {
        self.epsg.is_some() || self.wkt.is_some()
    }

    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (self.epsg, &self.wkt) {
            (Some(code), _) => write!(f, "EPSG:{code}"),
            (None, Some(wkt)) => f.write_str(wkt),
            (None, None) => f.write_str("undefined"),
        }
    }
}
