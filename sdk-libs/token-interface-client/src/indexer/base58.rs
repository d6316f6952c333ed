pub trait Base58Conversions {
    fn to_base58(&self) -> String;
}

impl Base58Conversions for [u8; 32] {
    fn to_base58(&self) -> String {
        bs58::encode(self).into_string()
    }
}
