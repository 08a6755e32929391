use std::{cmp::Ordering, fmt};

use alloy_primitives::{hex, B256, U256};

/// A protocol version packed into one storage word:
///
/// | bytes | field |
/// |---|---|
/// | `0` | version type, `0` is the only defined layout |
/// | `1..8` | reserved |
/// | `8..16` | build identifier |
/// | `16..20` | major |
/// | `20..24` | minor |
/// | `24..28` | patch |
/// | `28..32` | pre-release, `0` for a release |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ProtocolVersion(B256);

impl ProtocolVersion {
    pub fn new(build: [u8; 8], major: u32, minor: u32, patch: u32, pre_release: u32) -> Self {
        let mut word = [0u8; 32];
        word[8..16].copy_from_slice(&build);
        word[16..20].copy_from_slice(&major.to_be_bytes());
        word[20..24].copy_from_slice(&minor.to_be_bytes());
        word[24..28].copy_from_slice(&patch.to_be_bytes());
        word[28..32].copy_from_slice(&pre_release.to_be_bytes());
        Self(B256::from(word))
    }

    pub fn version_type(&self) -> u8 {
        self.0[0]
    }

    pub fn build(&self) -> [u8; 8] {
        let mut build = [0u8; 8];
        build.copy_from_slice(&self.0[8..16]);
        build
    }

    pub fn major(&self) -> u32 {
        self.field(16)
    }

    pub fn minor(&self) -> u32 {
        self.field(20)
    }

    pub fn patch(&self) -> u32 {
        self.field(24)
    }

    pub fn pre_release(&self) -> u32 {
        self.field(28)
    }

    pub fn as_word(&self) -> B256 {
        self.0
    }

    pub fn to_u256(&self) -> U256 {
        U256::from_be_bytes(self.0 .0)
    }

    /// Precedence key. A release (pre-release `0`) ranks above its pre-releases;
    /// the build identifier only breaks ties.
    fn precedence(&self) -> (u8, u32, u32, u32, bool, u32, [u8; 8]) {
        (
            self.version_type(),
            self.major(),
            self.minor(),
            self.patch(),
            self.pre_release() == 0,
            self.pre_release(),
            self.build(),
        )
    }

    fn field(&self, offset: usize) -> u32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.0[offset..offset + 4]);
        u32::from_be_bytes(bytes)
    }
}

impl Ord for ProtocolVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence()
            .cmp(&other.precedence())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for ProtocolVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<B256> for ProtocolVersion {
    fn from(word: B256) -> Self {
        Self(word)
    }
}

impl From<U256> for ProtocolVersion {
    fn from(value: U256) -> Self {
        Self(B256::from(value))
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version_type() != 0 {
            return write!(f, "v0.0.0-unknown.{}", hex::encode(self.0));
        }

        write!(f, "v{}.{}.{}", self.major(), self.minor(), self.patch())?;
        if self.pre_release() != 0 {
            write!(f, "-{}", self.pre_release())?;
        }
        let build = self.build();
        if build != [0u8; 8] {
            write!(f, "+0x{}", hex::encode(build))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_layout() {
        let version = ProtocolVersion::new(*b"optimism", 3, 1, 4, 1);

        assert_eq!(
            version.as_word(),
            B256::from(hex!(
                "00000000000000006f7074696d69736d00000003000000010000000400000001"
            ))
        );
        assert_eq!(version.version_type(), 0);
        assert_eq!(&version.build(), b"optimism");
        assert_eq!(
            (version.major(), version.minor(), version.patch(), version.pre_release()),
            (3, 1, 4, 1)
        );
        assert_eq!(ProtocolVersion::from(version.to_u256()), version);
    }

    #[test]
    fn test_display() {
        assert_eq!(ProtocolVersion::new([0; 8], 6, 0, 0, 0).to_string(), "v6.0.0");
        assert_eq!(
            ProtocolVersion::new([0; 8], 7, 1, 2, 3).to_string(),
            "v7.1.2-3"
        );
        assert_eq!(
            ProtocolVersion::new([0, 0, 0, 0, 0, 0, 0, 1], 1, 0, 0, 0).to_string(),
            "v1.0.0+0x0000000000000001"
        );

        let mut unknown = [0u8; 32];
        unknown[0] = 1;
        assert!(ProtocolVersion::from(B256::from(unknown))
            .to_string()
            .starts_with("v0.0.0-unknown."));
    }

    #[test]
    fn test_ordering_follows_major_minor_patch() {
        let old = ProtocolVersion::new([0; 8], 3, 9, 9, 0);
        let new = ProtocolVersion::new([0; 8], 4, 0, 0, 0);
        assert!(old < new);

        // The build identifier sits before major in the word but does not outrank it.
        let old_with_build = ProtocolVersion::new([0xff; 8], 3, 9, 9, 0);
        assert!(old_with_build < new);
        assert!(
            ProtocolVersion::new([0xff; 8], 4, 1, 0, 0) < ProtocolVersion::new([0; 8], 4, 2, 0, 0)
        );

        // A release ranks above its pre-releases.
        let candidate = ProtocolVersion::new([0; 8], 4, 0, 0, 2);
        assert!(candidate < new);
        assert!(ProtocolVersion::new([0; 8], 4, 0, 0, 1) < candidate);
        assert!(candidate < ProtocolVersion::new([0; 8], 4, 0, 1, 1));
    }
}
