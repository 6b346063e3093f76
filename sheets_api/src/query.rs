//! Query parameters for the `values.get` endpoint: the [`Query`] trait and [`ValuesQuery`].

use url::Url;

/// Trait implemented by query builders that serialize themselves onto a request URL.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;
}

/// How cell values are rendered in the response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValueRenderOption {
    /// Values as they appear in the sheet UI (the API default).
    #[default]
    FormattedValue,
    /// Raw computed values without formatting.
    UnformattedValue,
    /// Formulas instead of computed values.
    Formula,
}
impl std::fmt::Display for ValueRenderOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ValueRenderOption::FormattedValue => "FORMATTED_VALUE",
                ValueRenderOption::UnformattedValue => "UNFORMATTED_VALUE",
                ValueRenderOption::Formula => "FORMULA",
            }
        )
    }
}

/// How date/time cells are rendered when values are unformatted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateTimeRenderOption {
    /// Days since the 1899-12-30 epoch as a number.
    SerialNumber,
    /// The formatted date string.
    FormattedString,
}
impl std::fmt::Display for DateTimeRenderOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DateTimeRenderOption::SerialNumber => "SERIAL_NUMBER",
                DateTimeRenderOption::FormattedString => "FORMATTED_STRING",
            }
        )
    }
}

/// Whether the outer array of `values` holds rows or columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MajorDimension {
    #[default]
    Rows,
    Columns,
}
impl std::fmt::Display for MajorDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MajorDimension::Rows => "ROWS",
                MajorDimension::Columns => "COLUMNS",
            }
        )
    }
}

/// Optional render parameters for a range read. Unset fields use the API defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValuesQuery {
    pub value_render_option: Option<ValueRenderOption>,
    pub date_time_render_option: Option<DateTimeRenderOption>,
    pub major_dimension: Option<MajorDimension>,
}

impl ValuesQuery {
    pub fn with_value_render_option(mut self, option: ValueRenderOption) -> Self {
        self.value_render_option = Some(option);
        self
    }

    pub fn with_date_time_render_option(mut self, option: DateTimeRenderOption) -> Self {
        self.date_time_render_option = Some(option);
        self
    }

    pub fn with_major_dimension(mut self, dimension: MajorDimension) -> Self {
        self.major_dimension = Some(dimension);
        self
    }
}

impl Query for ValuesQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(option) = self.value_render_option {
            url.query_pairs_mut()
                .append_pair("valueRenderOption", &option.to_string());
        }
        if let Some(option) = self.date_time_render_option {
            url.query_pairs_mut()
                .append_pair("dateTimeRenderOption", &option.to_string());
        }
        if let Some(dimension) = self.major_dimension {
            url.query_pairs_mut()
                .append_pair("majorDimension", &dimension.to_string());
        }
        url
    }
}
