//! IPv4 CIDR arithmetic
//!
//! Subnet address blocks are carved deterministically out of the VPC
//! block: the n-th subnet of a given prefix length is the n-th
//! equally-sized slice of the parent range.

use crate::error::{Result, SynthError};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An IPv4 address block in CIDR notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CidrBlock {
    base: u32,
    prefix: u8,
}

impl CidrBlock {
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Number of addresses in the block
    pub fn size(&self) -> u64 {
        1u64 << (32 - self.prefix)
    }

    /// The `index`-th sub-block of `new_prefix` length.
    ///
    /// `new_prefix` must not be shorter than the parent prefix, and the
    /// index must fit inside the parent block.
    pub fn subnet(&self, new_prefix: u8, index: u32) -> Result<CidrBlock> {
        if new_prefix > 32 || new_prefix < self.prefix {
            return Err(SynthError::InvalidCidr(format!(
                "cannot carve /{new_prefix} subnets out of {self}"
            )));
        }

        let count = 1u64 << (new_prefix - self.prefix);
        if u64::from(index) >= count {
            return Err(SynthError::InvalidCidr(format!(
                "subnet index {index} out of range: {self} holds {count} /{new_prefix} blocks"
            )));
        }

        let offset = u64::from(index) << (32 - new_prefix);
        Ok(CidrBlock {
            base: self.base + offset as u32,
            prefix: new_prefix,
        })
    }
}

impl FromStr for CidrBlock {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| SynthError::InvalidCidr(format!("'{s}' is not in a.b.c.d/len form")))?;

        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| SynthError::InvalidCidr(format!("'{s}' has an invalid address part")))?;

        let prefix: u8 = prefix
            .parse()
            .ok()
            .filter(|p| *p <= 32)
            .ok_or_else(|| SynthError::InvalidCidr(format!("'{s}' has an invalid prefix length")))?;

        let base = u32::from(addr);
        let mask = if prefix == 0 {
            0
        } else {
            u32::MAX << (32 - prefix)
        };
        if base & !mask != 0 {
            return Err(SynthError::InvalidCidr(format!("'{s}' has host bits set")));
        }

        Ok(Self { base, prefix })
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", Ipv4Addr::from(self.base), self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let block: CidrBlock = "10.0.0.0/16".parse().unwrap();
        assert_eq!(block.prefix(), 16);
        assert_eq!(block.to_string(), "10.0.0.0/16");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("10.0.0.0".parse::<CidrBlock>().is_err());
        assert!("10.0.0.256/16".parse::<CidrBlock>().is_err());
        assert!("10.0.0.0/33".parse::<CidrBlock>().is_err());
        assert!("10.0.0.0/x".parse::<CidrBlock>().is_err());
    }

    #[test]
    fn test_parse_rejects_host_bits() {
        assert!("10.0.0.1/16".parse::<CidrBlock>().is_err());
        assert!("10.0.1.0/16".parse::<CidrBlock>().is_err());
    }

    #[test]
    fn test_sequential_slash24_allocation() {
        let vpc: CidrBlock = "10.0.0.0/16".parse().unwrap();
        assert_eq!(vpc.subnet(24, 0).unwrap().to_string(), "10.0.0.0/24");
        assert_eq!(vpc.subnet(24, 1).unwrap().to_string(), "10.0.1.0/24");
        assert_eq!(vpc.subnet(24, 5).unwrap().to_string(), "10.0.5.0/24");
        assert_eq!(vpc.subnet(24, 255).unwrap().to_string(), "10.0.255.0/24");
    }

    #[test]
    fn test_subnet_index_out_of_range() {
        let vpc: CidrBlock = "10.0.0.0/16".parse().unwrap();
        assert!(vpc.subnet(24, 256).is_err());
    }

    #[test]
    fn test_cannot_carve_larger_blocks() {
        let vpc: CidrBlock = "10.0.0.0/25".parse().unwrap();
        assert!(matches!(vpc.subnet(24, 0), Err(SynthError::InvalidCidr(_))));
    }
}
