//! Output encoders (SVG, PDF, PNG, TIFF).

mod pdf;
mod png_encoder;
mod svg;
mod tiff;

pub use pdf::PdfEncoder;
pub use png_encoder::PngEncoder;
pub use svg::SvgEncoder;
pub use tiff::TiffEncoder;

/// Format a coordinate for vector output: at most three decimals, trailing
/// zeros dropped, no negative zero.
pub(crate) fn num(value: f32) -> String {
    let mut s = format!("{value:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_trims_zeros() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(0.125), "0.125");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(3.5039), "3.504");
        assert_eq!(num(-2.5), "-2.5");
    }
}
