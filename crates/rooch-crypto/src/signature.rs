//! P-256 ECDSA signature components, DER parsing and low-S normalization.
//!
//! Signatures produced by this SDK are always the 64-byte compact `r || s`
//! form. WebAuthn authenticators return DER, possibly high-S;
//! [`EcdsaSignature`] converts them into the canonical compact form.

use crate::CryptoError;

/// P-256 group order N = FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551.
const P256_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xBC, 0xE6, 0xFA, 0xAD, 0xA7, 0x17, 0x9E, 0x84, 0xF3, 0xB9, 0xCA, 0xC2, 0xFC, 0x63, 0x25, 0x51,
];

/// N / 2, rounded down.
const P256_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0x80, 0x00, 0x00, 0x00, 0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xDE, 0x73, 0x7D, 0x56, 0xD3, 0x8B, 0xCF, 0x42, 0x79, 0xDC, 0xE5, 0x61, 0x7E, 0x31, 0x92, 0xA8,
];

/// A P-256 ECDSA signature with big-endian R and S components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaSignature {
    r: [u8; 32],
    s: [u8; 32],
}

impl EcdsaSignature {
    /// Create a signature from raw R and S 32-byte arrays.
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        EcdsaSignature { r, s }
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Parse a 64-byte compact `r || s` signature.
    pub fn from_compact(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 64 {
            return Err(CryptoError::InvalidSignatureEncoding(format!(
                "compact signature must be 64 bytes, got {}",
                bytes.len()
            )));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Ok(EcdsaSignature { r, s })
    }

    /// Parse a DER-encoded ECDSA signature.
    ///
    /// Expected format: `0x30 <len> 0x02 <r_len> <r> 0x02 <s_len> <s>`, with
    /// no trailing bytes. Leading zero padding on R and S is stripped. Both
    /// integers must be non-zero and below the group order.
    ///
    /// # Returns
    /// `Ok(EcdsaSignature)` on success, or `InvalidSignatureEncoding`.
    pub fn from_der(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < 8 {
            return Err(malformed("too short"));
        }
        if bytes[0] != 0x30 {
            return Err(malformed("no header magic"));
        }
        let sig_len = bytes[1] as usize;
        if sig_len + 2 != bytes.len() {
            return Err(malformed("bad length"));
        }

        let mut idx = 2;
        let (r_bytes, next) = read_der_int(bytes, idx, "R")?;
        idx = next;
        let (s_bytes, next) = read_der_int(bytes, idx, "S")?;
        if next != bytes.len() {
            return Err(malformed("trailing bytes after S"));
        }

        let r = to_32_bytes(r_bytes)?;
        let s = to_32_bytes(s_bytes)?;

        if is_zero(&r) {
            return Err(malformed("R is zero"));
        }
        if is_zero(&s) {
            return Err(malformed("S is zero"));
        }
        if !is_less_than(&r, &P256_ORDER) {
            return Err(malformed("R is >= group order"));
        }
        if !is_less_than(&s, &P256_ORDER) {
            return Err(malformed("S is >= group order"));
        }

        Ok(EcdsaSignature { r, s })
    }

    /// True if S is at most half the group order.
    pub fn is_low_s(&self) -> bool {
        !is_greater_than(&self.s, &P256_HALF_ORDER)
    }

    /// Replace S with `N - S` when S is above half the group order.
    pub fn normalize_s(self) -> Self {
        if self.is_low_s() {
            self
        } else {
            EcdsaSignature {
                r: self.r,
                s: subtract_from_order(&self.s),
            }
        }
    }

    /// Serialize as 64-byte compact `r || s`.
    pub fn to_compact(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }

    /// Serialize in DER format (no normalization).
    pub fn to_der(&self) -> Vec<u8> {
        let rb = canonicalize_int(&self.r);
        let sb = canonicalize_int(&self.s);

        let total_len = 6 + rb.len() + sb.len();
        let mut out = Vec::with_capacity(total_len);
        out.push(0x30);
        out.push((total_len - 2) as u8);
        out.push(0x02);
        out.push(rb.len() as u8);
        out.extend_from_slice(&rb);
        out.push(0x02);
        out.push(sb.len() as u8);
        out.extend_from_slice(&sb);
        out
    }
}

fn malformed(reason: &str) -> CryptoError {
    CryptoError::InvalidSignatureEncoding(format!("malformed DER signature: {}", reason))
}

/// Read one `0x02 <len> <bytes>` integer starting at `idx`.
fn read_der_int<'a>(
    data: &'a [u8],
    idx: usize,
    name: &str,
) -> Result<(&'a [u8], usize), CryptoError> {
    if data.get(idx) != Some(&0x02) {
        return Err(malformed(&format!("no int marker for {}", name)));
    }
    let len = *data
        .get(idx + 1)
        .ok_or_else(|| malformed(&format!("missing {} length", name)))? as usize;
    let start = idx + 2;
    if len == 0 || start + len > data.len() {
        return Err(malformed(&format!("bogus {} length", name)));
    }
    if data[start] & 0x80 != 0 {
        return Err(malformed(&format!("{} is negative", name)));
    }
    Ok((&data[start..start + len], start + len))
}

/// Strip leading zeros from a 32-byte big-endian integer, re-adding one
/// zero byte when the high bit is set so DER reads it as positive.
fn canonicalize_int(val: &[u8; 32]) -> Vec<u8> {
    let mut start = 0;
    while start < 31 && val[start] == 0 {
        start += 1;
    }
    let trimmed = &val[start..];
    if trimmed[0] & 0x80 != 0 {
        let mut out = Vec::with_capacity(trimmed.len() + 1);
        out.push(0x00);
        out.extend_from_slice(trimmed);
        out
    } else {
        trimmed.to_vec()
    }
}

/// Strip zero padding from a big-endian integer and left-pad it to 32 bytes.
fn to_32_bytes(bytes: &[u8]) -> Result<[u8; 32], CryptoError> {
    let mut trimmed = bytes;
    while trimmed.len() > 1 && trimmed[0] == 0 {
        trimmed = &trimmed[1..];
    }
    if trimmed.len() > 32 {
        return Err(malformed("integer too large for 32 bytes"));
    }
    let mut out = [0u8; 32];
    out[32 - trimmed.len()..].copy_from_slice(trimmed);
    Ok(out)
}

fn is_zero(val: &[u8; 32]) -> bool {
    val.iter().all(|&b| b == 0)
}

fn is_less_than(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a < b
}

fn is_greater_than(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a > b
}

/// Compute `N - val`.
fn subtract_from_order(val: &[u8; 32]) -> [u8; 32] {
    let n = &P256_ORDER;
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;
    for i in (0..32).rev() {
        let diff = n[i] as i32 - val[i] as i32 - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_to_32(s: &str) -> [u8; 32] {
        hex::decode(s).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_der_parsing_known_signature() {
        let der = hex::decode(
            "304402204e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41\
             0220181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d09",
        )
        .unwrap();
        let sig = EcdsaSignature::from_der(&der).unwrap();
        assert_eq!(
            sig.r(),
            &hex_to_32("4e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41")
        );
        assert_eq!(sig.to_der(), der);
    }

    #[test]
    fn test_der_parsing_rejects_malformed() {
        let valid = EcdsaSignature::new([1; 32], [2; 32]).to_der();
        assert!(EcdsaSignature::from_der(&valid).is_ok());

        let cases: Vec<Vec<u8>> = vec![
            vec![],
            {
                let mut v = valid.clone();
                v[0] = 0x31;
                v
            },
            {
                let mut v = valid.clone();
                v[2] = 0x03;
                v
            },
            {
                let mut v = valid.clone();
                v[1] += 1;
                v
            },
            {
                let mut v = valid.clone();
                v.push(0x00);
                v
            },
            valid[..valid.len() - 1].to_vec(),
            // Zero R.
            vec![0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x01],
        ];
        for der in cases {
            assert!(
                matches!(
                    EcdsaSignature::from_der(&der),
                    Err(CryptoError::InvalidSignatureEncoding(_))
                ),
                "should reject {}",
                hex::encode(&der)
            );
        }
    }

    #[test]
    fn test_der_rejects_s_at_or_above_order() {
        let sig = EcdsaSignature::new([1; 32], P256_ORDER);
        assert!(EcdsaSignature::from_der(&sig.to_der()).is_err());
    }

    #[test]
    fn test_der_strips_zero_padding() {
        // R has a 0x00 pad because its high bit is set.
        let r = hex_to_32("a196ed0e7ebcbe7b63fe1d8eecbdbde03a67ceba4fc8f6482bdcb9606a911404");
        let s = hex_to_32("0000000000000000000000000000000000000000000000000000000000000005");
        let der = EcdsaSignature::new(r, s).to_der();
        assert_eq!(der[3], 33);
        let parsed = EcdsaSignature::from_der(&der).unwrap();
        assert_eq!(parsed.r(), &r);
        assert_eq!(parsed.s(), &s);
    }

    #[test]
    fn test_low_s_normalization() {
        // N - 1 is the largest valid S.
        let mut s = P256_ORDER;
        s[31] -= 1;
        let sig = EcdsaSignature::new([7; 32], s);
        assert!(!sig.is_low_s());
        let sig = sig.normalize_s();
        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(sig.s(), &one);

        // Exactly half stays as-is.
        let half = EcdsaSignature::new([7; 32], P256_HALF_ORDER);
        assert!(half.is_low_s());
        assert_eq!(half.clone().normalize_s(), half);
    }

    #[test]
    fn test_compact_roundtrip() {
        let sig = EcdsaSignature::new([3; 32], [4; 32]);
        let compact = sig.to_compact();
        assert_eq!(EcdsaSignature::from_compact(&compact).unwrap(), sig);
        assert!(EcdsaSignature::from_compact(&compact[..63]).is_err());
    }
}
