use glam::DVec2;

/// Fixed-size little-endian encoding of a value.
pub trait AsBytes<const N: usize> {
    fn from_bytes(b: [u8; N]) -> Self;

    fn to_bytes(self) -> [u8; N];
}

impl AsBytes<1> for u8 {
    fn from_bytes(b: [u8; 1]) -> Self {
        b[0]
    }

    fn to_bytes(self) -> [u8; 1] {
        [self]
    }
}

impl AsBytes<4> for u32 {
    fn from_bytes(b: [u8; 4]) -> Self {
        u32::from_le_bytes(b)
    }

    fn to_bytes(self) -> [u8; 4] {
        self.to_le_bytes()
    }
}

impl AsBytes<8> for u64 {
    fn from_bytes(b: [u8; 8]) -> Self {
        u64::from_le_bytes(b)
    }

    fn to_bytes(self) -> [u8; 8] {
        self.to_le_bytes()
    }
}

impl AsBytes<8> for f64 {
    fn from_bytes(b: [u8; 8]) -> Self {
        f64::from_le_bytes(b)
    }

    fn to_bytes(self) -> [u8; 8] {
        self.to_le_bytes()
    }
}

impl AsBytes<16> for DVec2 {
    fn from_bytes(b: [u8; 16]) -> Self {
        let mut x = [0; 8];
        let mut y = [0; 8];
        x.copy_from_slice(&b[0..8]);
        y.copy_from_slice(&b[8..16]);

        DVec2::new(f64::from_bytes(x), f64::from_bytes(y))
    }

    fn to_bytes(self) -> [u8; 16] {
        let mut b = [0; 16];
        b[0..8].copy_from_slice(&self.x.to_bytes());
        b[8..16].copy_from_slice(&self.y.to_bytes());
        b
    }
}
