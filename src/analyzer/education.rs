/// Education categories, one indicator column each in the credit data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Education {
    GraduateSchool,
    University,
    HighSchool,
    Others,
}

impl Education {
    pub const ALL: [Education; 4] = [
        Education::GraduateSchool,
        Education::University,
        Education::HighSchool,
        Education::Others,
    ];

    /// Column name of the indicator in the source file.
    pub fn column(self) -> &'static str {
        match self {
            Education::GraduateSchool => "education:1",
            Education::University => "education:2",
            Education::HighSchool => "education:3",
            Education::Others => "education:4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Education::GraduateSchool => "graduate school",
            Education::University => "university",
            Education::HighSchool => "high school",
            Education::Others => "others",
        }
    }

    pub fn from_column(name: &str) -> Option<Education> {
        Education::ALL.iter().copied().find(|e| e.column() == name)
    }

    /// Maps an indicator column name to its label, for [`Table::rename`](super::Table::rename).
    pub fn relabel(name: &str) -> Option<&'static str> {
        Education::from_column(name).map(Education::label)
    }
}
