//! `Display` formatting for [`Tensor`]

use std::fmt;

use super::Tensor;
use crate::dtype::Element;
use crate::runtime::{Device, Runtime};

/// Decimal places for floating point elements when the formatter has none
const DEFAULT_PRECISION: usize = 4;

/// Nested brackets following the shape, one fixed column width, and a trailing
/// `<Tensor 2x3 i32 @cpu(0)>` annotation:
///
/// ```text
/// [[ 1, 2, 3],
///  [ 4, 5, 6]]
/// <Tensor 2x3 i32 @cpu(0)>
/// ```
///
/// Floating point elements use the formatter precision (`{:.2}`), four
/// decimals by default. Non-host tensors are downloaded first. The output is
/// for people; it is not meant to be parsed back.
impl<T: Element, R: Runtime> fmt::Display for Tensor<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.to_vec().map_err(|_| fmt::Error)?;
        let float = T::DTYPE.is_float();
        let precision = f.precision().unwrap_or(DEFAULT_PRECISION);

        let mut width = data
            .iter()
            .map(|&x| integer_width(x, float) + 1)
            .max()
            .unwrap_or(0);
        if float {
            width += precision + 1;
        }

        // row lengths of each nesting level, outermost first
        let dims = self.dims();
        let mut block = vec![1usize; dims.len()];
        let mut acc = 1usize;
        for (b, &d) in block.iter_mut().zip(dims).rev() {
            acc = acc.saturating_mul(d);
            *b = acc;
        }

        let last = data.len().saturating_sub(1);
        for (i, &x) in data.iter().enumerate() {
            if block.iter().any(|&v| i % v == 0) {
                for &v in &block {
                    f.write_str(if i % v == 0 { "[" } else { " " })?;
                }
            }

            if float {
                write!(f, "{:>width$.precision$}", x.to_f64())?;
            } else {
                write!(f, "{x:>width$}")?;
            }

            let mut end_of_dim = false;
            for &v in &block {
                if i % v == v - 1 {
                    end_of_dim = true;
                    f.write_str("]")?;
                }
            }
            if i != last {
                f.write_str(",")?;
                if end_of_dim {
                    f.write_str("\n")?;
                }
            }
        }

        if data.is_empty() {
            f.write_str("[]")?;
        }

        f.write_str("\n<Tensor ")?;
        if dims.is_empty() {
            f.write_str("empty")?;
        }
        for (i, d) in dims.iter().enumerate() {
            if i != 0 {
                f.write_str("x")?;
            }
            write!(f, "{d}")?;
        }
        let device = self.device();
        write!(f, " {} @{}({})>", T::DTYPE, device.name(), device.id())
    }
}

/// Characters before the decimal point, sign included
fn integer_width<T: Element>(x: T, float: bool) -> usize {
    if !float {
        return x.to_string().len();
    }
    let v = x.to_f64();
    let digits = format!("{:.0}", v.abs().floor().max(1.0)).len();
    digits + usize::from(v < 0.0)
}
