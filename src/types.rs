use serde::{Deserialize, Serialize};

use crate::error::{DynectError, Result};

// ============ Record Types ============

/// DNS record types understood by the DynECT REST API.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"ALIAS"`, etc.), which
/// are also the strings embedded in record URLs (`ARecord/...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// DynECT alias record (CNAME-like, allowed at the zone apex).
    Alias,
    /// Canonical name record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Name server record.
    Ns,
    /// Start of authority record.
    Soa,
    /// Text record.
    Txt,
    /// Sender policy framework record (legacy TXT sibling).
    Spf,
}

impl RecordType {
    /// Parse a wire record type string.
    pub fn parse(record_type: &str) -> Result<Self> {
        match record_type.to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "ALIAS" => Ok(Self::Alias),
            "CNAME" => Ok(Self::Cname),
            "MX" => Ok(Self::Mx),
            "NS" => Ok(Self::Ns),
            "SOA" => Ok(Self::Soa),
            "TXT" => Ok(Self::Txt),
            "SPF" => Ok(Self::Spf),
            _ => Err(DynectError::UnsupportedRecordType {
                record_type: record_type.to_string(),
            }),
        }
    }

    /// The uppercase wire string for this record type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Alias => "ALIAS",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Soa => "SOA",
            Self::Txt => "TXT",
            Self::Spf => "SPF",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ RData ============

/// Type-safe representation of record data.
///
/// Each variant carries the fields its record type populates in the DynECT
/// `rdata` block. Built from a flat value string with [`build`](Self::build)
/// and flattened back with [`value_string`](Self::value_string); the match
/// in each direction is exhaustive, so adding a record type without its
/// payload mapping fails to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    /// A record payload.
    A {
        /// IPv4 address (e.g. `"192.0.2.1"`).
        address: String,
    },
    /// AAAA record payload.
    Aaaa {
        /// IPv6 address (e.g. `"2001:db8::1"`).
        address: String,
    },
    /// ALIAS record payload.
    Alias {
        /// Target hostname.
        alias: String,
    },
    /// CNAME record payload.
    Cname {
        /// Canonical hostname.
        cname: String,
    },
    /// MX record payload.
    Mx {
        /// Priority (lower wins).
        preference: u16,
        /// Mail server hostname.
        exchange: String,
    },
    /// NS record payload.
    Ns {
        /// Name server hostname.
        nsdname: String,
    },
    /// SOA record payload. Only the contact name is writable through this
    /// API; the remaining SOA fields are zone-managed.
    Soa {
        /// Responsible-party contact name.
        rname: String,
    },
    /// TXT record payload.
    Txt {
        /// Text content.
        txtdata: String,
    },
    /// SPF record payload (same shape as TXT).
    Spf {
        /// Policy text content.
        txtdata: String,
    },
}

impl RData {
    /// Build record data from a record type and its flat value string.
    ///
    /// MX values are parsed positionally as `"preference exchange"`; a
    /// preference that is not a `u16` or a missing exchange is an
    /// [`InvalidValue`](DynectError::InvalidValue) error.
    pub fn build(record_type: RecordType, value: &str) -> Result<Self> {
        let owned = || value.to_string();
        Ok(match record_type {
            RecordType::A => Self::A { address: owned() },
            RecordType::Aaaa => Self::Aaaa { address: owned() },
            RecordType::Alias => Self::Alias { alias: owned() },
            RecordType::Cname => Self::Cname { cname: owned() },
            RecordType::Mx => {
                let mut fields = value.split_whitespace();
                let preference = fields
                    .next()
                    .and_then(|p| p.parse::<u16>().ok())
                    .ok_or_else(|| DynectError::InvalidValue {
                        value: value.to_string(),
                        detail: "MX preference must be an unsigned integer".to_string(),
                    })?;
                let exchange = fields.next().ok_or_else(|| DynectError::InvalidValue {
                    value: value.to_string(),
                    detail: "MX value must be 'preference exchange'".to_string(),
                })?;
                Self::Mx {
                    preference,
                    exchange: exchange.to_string(),
                }
            }
            RecordType::Ns => Self::Ns { nsdname: owned() },
            RecordType::Soa => Self::Soa { rname: owned() },
            RecordType::Txt => Self::Txt { txtdata: owned() },
            RecordType::Spf => Self::Spf { txtdata: owned() },
        })
    }

    /// Returns the [`RecordType`] discriminant for this payload.
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::A { .. } => RecordType::A,
            Self::Aaaa { .. } => RecordType::Aaaa,
            Self::Alias { .. } => RecordType::Alias,
            Self::Cname { .. } => RecordType::Cname,
            Self::Mx { .. } => RecordType::Mx,
            Self::Ns { .. } => RecordType::Ns,
            Self::Soa { .. } => RecordType::Soa,
            Self::Txt { .. } => RecordType::Txt,
            Self::Spf { .. } => RecordType::Spf,
        }
    }

    /// Flatten the payload back to the single value string callers work
    /// with. MX renders as `"preference exchange"` with a single space.
    pub fn value_string(&self) -> String {
        match self {
            Self::A { address } | Self::Aaaa { address } => address.clone(),
            Self::Alias { alias } => alias.clone(),
            Self::Cname { cname } => cname.clone(),
            Self::Mx {
                preference,
                exchange,
            } => format!("{preference} {exchange}"),
            Self::Ns { nsdname } => nsdname.clone(),
            Self::Soa { rname } => rname.clone(),
            Self::Txt { txtdata } | Self::Spf { txtdata } => txtdata.clone(),
        }
    }

    /// Convert to the wire `rdata` block, populating only this type's
    /// fields.
    pub(crate) fn to_block(&self) -> DataBlock {
        let mut block = DataBlock::default();
        match self {
            Self::A { address } | Self::Aaaa { address } => {
                block.address = Some(address.clone());
            }
            Self::Alias { alias } => block.alias = Some(alias.clone()),
            Self::Cname { cname } => block.cname = Some(cname.clone()),
            Self::Mx {
                preference,
                exchange,
            } => {
                block.preference = Some(*preference);
                block.exchange = Some(exchange.clone());
            }
            Self::Ns { nsdname } => block.nsdname = Some(nsdname.clone()),
            Self::Soa { rname } => block.rname = Some(rname.clone()),
            Self::Txt { txtdata } | Self::Spf { txtdata } => {
                block.txtdata = Some(txtdata.clone());
            }
        }
        block
    }

    /// Rebuild typed record data from a response `rdata` block.
    ///
    /// The block is demuxed by `record_type`; a block missing the field its
    /// type requires is a [`ParseError`](DynectError::ParseError).
    pub(crate) fn from_block(record_type: RecordType, block: &DataBlock) -> Result<Self> {
        let require = |field: Option<&String>, name: &str| {
            field.cloned().ok_or_else(|| DynectError::ParseError {
                detail: format!("{record_type} rdata is missing '{name}'"),
            })
        };
        Ok(match record_type {
            RecordType::A => Self::A {
                address: require(block.address.as_ref(), "address")?,
            },
            RecordType::Aaaa => Self::Aaaa {
                address: require(block.address.as_ref(), "address")?,
            },
            RecordType::Alias => Self::Alias {
                alias: require(block.alias.as_ref(), "alias")?,
            },
            RecordType::Cname => Self::Cname {
                cname: require(block.cname.as_ref(), "cname")?,
            },
            RecordType::Mx => Self::Mx {
                preference: block.preference.ok_or_else(|| DynectError::ParseError {
                    detail: "MX rdata is missing 'preference'".to_string(),
                })?,
                exchange: require(block.exchange.as_ref(), "exchange")?,
            },
            RecordType::Ns => Self::Ns {
                nsdname: require(block.nsdname.as_ref(), "nsdname")?,
            },
            RecordType::Soa => Self::Soa {
                rname: require(block.rname.as_ref(), "rname")?,
            },
            RecordType::Txt => Self::Txt {
                txtdata: require(block.txtdata.as_ref(), "txtdata")?,
            },
            RecordType::Spf => Self::Spf {
                txtdata: require(block.txtdata.as_ref(), "txtdata")?,
            },
        })
    }
}

// ============ Wire Types ============

/// The DynECT `rdata` block as it appears on the wire.
///
/// Every field is optional; each record type populates a disjoint subset.
/// Field names mirror the API schema exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsdname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txtdata: Option<String>,
}

/// Request envelope for record create/update calls.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RecordRequest {
    pub rdata: DataBlock,
    pub ttl: String,
}

/// Record detail payload returned by `GET {type}Record/{zone}/{fqdn}/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RecordDetail {
    pub zone: String,
    pub fqdn: String,
    pub record_type: String,
    pub ttl: u32,
    pub rdata: DataBlock,
}

// ============ Record DTO ============

/// A DNS record as the caller sees it.
///
/// Constructed with zone/name/type/value/TTL; the client fills in `fqdn`
/// and `id` as operations proceed. Transient per call, no long-lived
/// ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Zone (administrative domain) the record lives in.
    pub zone: String,
    /// Fully-qualified name. Derived from `name` + `zone` when left empty.
    pub fqdn: String,
    /// Name relative to the zone; empty for an apex record.
    pub name: String,
    /// Record type.
    pub record_type: RecordType,
    /// Flat value string, encoded per record type (MX: `"preference exchange"`).
    pub value: String,
    /// TTL in seconds, string-encoded as the API accepts it.
    pub ttl: String,
    /// Provider-assigned record ID. Empty until resolved.
    pub id: String,
}

impl Record {
    /// Create a record DTO with an empty FQDN and ID.
    pub fn new(
        zone: impl Into<String>,
        name: impl Into<String>,
        record_type: RecordType,
        value: impl Into<String>,
        ttl: impl Into<String>,
    ) -> Self {
        Self {
            zone: zone.into(),
            fqdn: String::new(),
            name: name.into(),
            record_type,
            value: value.into(),
            ttl: ttl.into(),
            id: String::new(),
        }
    }
}
