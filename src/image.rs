use crate::utility::native_enum;

native_enum! {
    /// `D2D1_INTERPOLATION_MODE`
    pub enum Interpolation {
        NearestNeighbor = 0,
        Linear = 1,
        Cubic = 2,
        MultiSampleLinear = 3,
        Anisotropic = 4,
        HighQualityCubic = 5,
    }
}

native_enum! {
    /// `D2D1_COMPOSITE_MODE`
    pub enum CompositeMode {
        SourceOver = 0,
        DestinationOver = 1,
        SourceIn = 2,
        DestinationIn = 3,
        SourceOut = 4,
        DestinationOut = 5,
        SourceAtop = 6,
        DestinationAtop = 7,
        Xor = 8,
        Plus = 9,
        SourceCopy = 10,
        BoundedSourceCopy = 11,
        MaskInvert = 12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn composite_mode_test() {
        assert_eq!(CompositeMode::try_from(12).unwrap(), CompositeMode::MaskInvert);
        assert_eq!(CompositeMode::try_from(13).unwrap_err(), ErrorKind::InvalidArg);
        assert_eq!(u32::from(Interpolation::HighQualityCubic), 5);
    }
}
