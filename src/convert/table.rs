// Converter dispatch table
// Maps every conversion route to the function that handles its payload

use serde_json::Value;

use super::Conversion;

/// Converter function applied to a request payload
pub type ConvertFn = fn(Value) -> Value;

/// Pass-through converter, returns the payload unchanged
#[allow(clippy::missing_const_for_fn)]
pub fn identity(value: Value) -> Value {
    value
}

/// Dispatch table from conversion route to converter
#[derive(Clone, Copy)]
pub struct ConverterTable {
    converters: [ConvertFn; Conversion::ALL.len()],
}

impl ConverterTable {
    /// Replace the converter used for one route
    pub fn set(&mut self, conversion: Conversion, converter: ConvertFn) -> &mut Self {
        self.converters[conversion.index()] = converter;
        self
    }

    /// Converter currently registered for `conversion`
    pub fn get(&self, conversion: Conversion) -> ConvertFn {
        self.converters[conversion.index()]
    }

    /// Run the converter registered for `conversion`
    pub fn convert(&self, conversion: Conversion, value: Value) -> Value {
        (self.get(conversion))(value)
    }
}

impl Default for ConverterTable {
    fn default() -> Self {
        Self {
            converters: [identity as ConvertFn; Conversion::ALL.len()],
        }
    }
}

impl std::fmt::Debug for ConverterTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterTable")
            .field("routes", &Conversion::ALL.map(Conversion::as_str))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_table_is_identity() {
        let table = ConverterTable::default();
        let samples = [
            json!(null),
            json!("3.14"),
            json!(42),
            json!(-7.5),
            json!([1, 2, 3]),
            json!({"nested": {"k": [true, false]}}),
        ];
        for conversion in Conversion::ALL {
            for sample in &samples {
                assert_eq!(&table.convert(conversion, sample.clone()), sample);
            }
        }
    }

    #[test]
    fn test_set_replaces_single_route() {
        fn wrap(value: Value) -> Value {
            json!({ "wrapped": value })
        }

        let mut table = ConverterTable::default();
        table.set(Conversion::IsToIp, wrap);

        assert_eq!(
            table.convert(Conversion::IsToIp, json!(1)),
            json!({"wrapped": 1})
        );
        for conversion in Conversion::ALL {
            if conversion != Conversion::IsToIp {
                assert_eq!(table.convert(conversion, json!(1)), json!(1));
            }
        }
    }
}
