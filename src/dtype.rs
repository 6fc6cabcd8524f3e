/// Native element representation stored per cell of a [`crate::array::TypedMultiArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    UnsignedByte,
    SignedByte,
    UnsignedShort,
    SignedShort,
    UnsignedInt,
    SignedInt,
    Float,
    Double,
}

impl ElementType {
    pub const ALL: [ElementType; 8] = [
        ElementType::UnsignedByte,
        ElementType::SignedByte,
        ElementType::UnsignedShort,
        ElementType::SignedShort,
        ElementType::UnsignedInt,
        ElementType::SignedInt,
        ElementType::Float,
        ElementType::Double,
    ];

    /// Size of one element in bytes.
    pub const fn byte_width(&self) -> usize {
        match self {
            ElementType::UnsignedByte | ElementType::SignedByte => 1,
            ElementType::UnsignedShort | ElementType::SignedShort => 2,
            ElementType::UnsignedInt | ElementType::SignedInt | ElementType::Float => 4,
            ElementType::Double => 8,
        }
    }

    pub const fn is_signed(&self) -> bool {
        !matches!(
            self,
            ElementType::UnsignedByte | ElementType::UnsignedShort | ElementType::UnsignedInt
        )
    }

    pub const fn is_floating(&self) -> bool {
        matches!(self, ElementType::Float | ElementType::Double)
    }

    /// Smallest and largest representable value, as `f64`.
    ///
    /// For floating types this is the finite range of the type.
    pub fn range(&self) -> (f64, f64) {
        match self {
            ElementType::UnsignedByte => (u8::MIN as f64, u8::MAX as f64),
            ElementType::SignedByte => (i8::MIN as f64, i8::MAX as f64),
            ElementType::UnsignedShort => (u16::MIN as f64, u16::MAX as f64),
            ElementType::SignedShort => (i16::MIN as f64, i16::MAX as f64),
            ElementType::UnsignedInt => (u32::MIN as f64, u32::MAX as f64),
            ElementType::SignedInt => (i32::MIN as f64, i32::MAX as f64),
            ElementType::Float => (f32::MIN as f64, f32::MAX as f64),
            ElementType::Double => (f64::MIN, f64::MAX),
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementType::UnsignedByte => "unsigned byte",
            ElementType::SignedByte => "signed byte",
            ElementType::UnsignedShort => "unsigned short",
            ElementType::SignedShort => "signed short",
            ElementType::UnsignedInt => "unsigned int",
            ElementType::SignedInt => "signed int",
            ElementType::Float => "float",
            ElementType::Double => "double",
        };
        f.write_str(name)
    }
}
