use super::definition::FormSpec;
use crate::error::SpecConversionError;

/// A trait for screen-specific models that can be converted into a `FormSpec`.
///
/// Screens that keep their form layout in their own format (a CMS record, a
/// generated schema, ...) implement this to hand the engine a canonical
/// specification tree.
///
/// # Example
///
/// ```rust,no_run
/// use keishiki::prelude::*;
/// use keishiki::error::SpecConversionError;
///
/// struct EmployeeColumn { key: String, title: String, editable: bool }
/// struct EmployeeTable { columns: Vec<EmployeeColumn> }
///
/// impl IntoFormSpec for EmployeeTable {
///     fn into_form_spec(self) -> std::result::Result<FormSpec, SpecConversionError> {
///         let nodes = self
///             .columns
///             .into_iter()
///             .filter(|c| c.editable)
///             .map(|c| FieldSpec::text(c.key.as_str()).with_label(c.title))
///             .collect();
///         Ok(FormSpec::new(nodes))
///     }
/// }
/// ```
pub trait IntoFormSpec {
    /// Consumes the object and converts it into a form specification.
    fn into_form_spec(self) -> Result<FormSpec, SpecConversionError>;
}
