//! # Serde module for sketches
//!
//! `LogLog` and `HyperLogLog` serialize into the tuple `(registers, ranks)`, where `registers`
//! is the register count and `ranks` holds one byte per register in register order.
//! The bit-packed layout and the hasher type are not part of the format.
//!
//! Deserialization rebuilds the registers through `from_ranks`, so a register count that is not
//! a power of two, a rank list of the wrong length, or a rank beyond the largest possible one
//! for the register count is rejected.
use std::hash::Hasher;

use serde::de::Error;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hyperloglog::HyperLogLog;
use crate::loglog::LogLog;
use crate::registers::Registers;
use crate::sketch::CardinalitySketch;

fn serialize_registers<S>(registers: &Registers, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let mut tup = serializer.serialize_tuple(2)?;
    tup.serialize_element(&registers.count())?;
    tup.serialize_element(&registers.iter().collect::<Vec<u8>>())?;
    tup.end()
}

fn deserialize_ranks<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let (count, ranks): (usize, Vec<u8>) = Deserialize::deserialize(deserializer)?;
    if ranks.len() != count {
        return Err(Error::custom(ConfigError::RegisterCount {
            expected: count,
            actual: ranks.len(),
        }));
    }
    Ok(ranks)
}

impl<H: Hasher + Default> Serialize for LogLog<H> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serialize_registers(self.registers(), serializer)
    }
}

impl<'de, H: Hasher + Default> Deserialize<'de> for LogLog<H> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let ranks = deserialize_ranks(deserializer)?;
        LogLog::from_ranks(&ranks).map_err(Error::custom)
    }
}

impl<H: Hasher + Default> Serialize for HyperLogLog<H> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serialize_registers(self.registers(), serializer)
    }
}

impl<'de, H: Hasher + Default> Deserialize<'de> for HyperLogLog<H> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let ranks = deserialize_ranks(deserializer)?;
        HyperLogLog::from_ranks(&ranks).map_err(Error::custom)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0; "empty set")]
    #[test_case(1; "single element")]
    #[test_case(100; "hundred distinct elements")]
    #[test_case(10000; "ten thousand distinct elements")]
    fn test_serde(n: usize) {
        let mut original = HyperLogLog::<crate::hash::Sha256Hasher>::new(256).unwrap();
        for i in 0..n {
            original.add(&format!("item{}", i));
        }

        let serialized = serde_json::to_string(&original).expect("serialization failed");
        let deserialized: HyperLogLog =
            serde_json::from_str(&serialized).expect("deserialization failed");

        assert_eq!(original, deserialized);
        assert_eq!(original.estimate(), deserialized.estimate());
    }

    #[test]
    fn test_loglog_format() {
        let sketch = LogLog::<crate::hash::Sha256Hasher>::from_ranks(&[0, 3, 1, 0]).unwrap();
        assert_eq!(serde_json::to_string(&sketch).unwrap(), "[4,[0,3,1,0]]");
    }

    #[test_case("{ invalid_json_string }"; "invalid json")]
    #[test_case("[3,[0,0,0]]"; "not a power of two")]
    #[test_case("[4,[0,0,0]]"; "length mismatch")]
    #[test_case("[4,[0,0,64,0]]"; "rank out of range")]
    #[test_case("[12345,null]"; "null ranks")]
    fn test_failed_deserialization(input: &str) {
        let result: Result<HyperLogLog, _> = serde_json::from_str(input);
        assert!(result.is_err());
    }
}
