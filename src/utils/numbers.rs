//! Formato de números en los textos de alertas

/// Decimales con los que cualquier `f64` se escribe sin redondeo
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Formatear con `digits` decimales, redondeando los empates exactos hacia
/// arriba (`0.25` → `"0.3"`, `62.5` → `"63"`).
///
/// `format!("{:.1}", x)` redondea los empates al par, así que solo se usa
/// cuando el valor no cae justo en la mitad.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = digits.min(EXACT_FRACTION_DIGITS);
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (integer, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let (kept, tail) = fraction.split_at(digits.min(fraction.len()));

    let is_tie = tail.starts_with('5') && tail.bytes().skip(1).all(|b| b == b'0');
    if !is_tie {
        return format!("{:.*}", digits, value);
    }

    let mut number: Vec<u8> = integer.bytes().chain(kept.bytes()).collect();
    let mut carry = true;
    for digit in number.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
            break;
        }
    }
    if carry {
        number.insert(0, b'1');
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let (integer, fraction) = number.split_at(number.len() - digits);
    let integer = String::from_utf8_lossy(integer);
    if digits == 0 {
        format!("{}{}", sign, integer)
    } else {
        format!("{}{}.{}", sign, integer, String::from_utf8_lossy(fraction))
    }
}
