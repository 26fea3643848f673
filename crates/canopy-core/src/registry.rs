//! Chart registry - the catalogue of charts the CLI offers
//!
//! The registry only answers "is this a chart we advertise?". Whether template
//! bytes exist for an id is the template store's concern.

use std::fmt;

/// Grouping used when listing charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartCategory {
    Basic,
    TimeSeries,
    PartToWhole,
    Statistical,
}

impl ChartCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            ChartCategory::Basic => "Basic",
            ChartCategory::TimeSeries => "Time series",
            ChartCategory::PartToWhole => "Part-to-whole",
            ChartCategory::Statistical => "Statistical",
        }
    }
}

impl fmt::Display for ChartCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// An npm package a chart needs at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartDependency {
    pub name: &'static str,
    /// Semver requirement, npm caret syntax
    pub version_req: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: ChartCategory,
    pub dependencies: &'static [ChartDependency],
}

const D3_SCALE: ChartDependency = ChartDependency {
    name: "d3-scale",
    version_req: "^4.0.0",
};
const D3_SHAPE: ChartDependency = ChartDependency {
    name: "d3-shape",
    version_req: "^3.2.0",
};
const D3_ARRAY: ChartDependency = ChartDependency {
    name: "d3-array",
    version_req: "^3.2.0",
};
const D3_TIME_FORMAT: ChartDependency = ChartDependency {
    name: "d3-time-format",
    version_req: "^4.1.0",
};

static CHARTS: &[ChartDescriptor] = &[
    ChartDescriptor {
        id: "bar-chart",
        name: "Bar Chart",
        description: "Vertical bars for comparing values across categories",
        category: ChartCategory::Basic,
        dependencies: &[D3_SCALE, D3_ARRAY],
    },
    ChartDescriptor {
        id: "line-chart",
        name: "Line Chart",
        description: "Trends over a continuous or time axis",
        category: ChartCategory::TimeSeries,
        dependencies: &[D3_SCALE, D3_SHAPE, D3_ARRAY, D3_TIME_FORMAT],
    },
    ChartDescriptor {
        id: "area-chart",
        name: "Area Chart",
        description: "Filled line chart for cumulative volume over time",
        category: ChartCategory::TimeSeries,
        dependencies: &[D3_SCALE, D3_SHAPE, D3_ARRAY, D3_TIME_FORMAT],
    },
    ChartDescriptor {
        id: "pie-chart",
        name: "Pie Chart",
        description: "Proportions of a whole, with optional donut hole",
        category: ChartCategory::PartToWhole,
        dependencies: &[D3_SHAPE],
    },
    ChartDescriptor {
        id: "scatter-plot",
        name: "Scatter Plot",
        description: "Correlation between two numeric variables",
        category: ChartCategory::Statistical,
        dependencies: &[D3_SCALE, D3_ARRAY],
    },
];

/// All registered charts, in display order
pub fn all() -> &'static [ChartDescriptor] {
    CHARTS
}

pub fn get(id: &str) -> Option<&'static ChartDescriptor> {
    CHARTS.iter().find(|c| c.id == id)
}

pub fn is_registered(id: &str) -> bool {
    get(id).is_some()
}

pub fn ids() -> Vec<&'static str> {
    CHARTS.iter().map(|c| c.id).collect()
}

/// Categories that have at least one chart, sorted
pub fn categories() -> Vec<ChartCategory> {
    let mut cats: Vec<ChartCategory> = CHARTS.iter().map(|c| c.category).collect();
    cats.sort();
    cats.dedup();
    cats
}

pub fn by_category(category: ChartCategory) -> Vec<&'static ChartDescriptor> {
    CHARTS.iter().filter(|c| c.category == category).collect()
}

/// Union of the dependencies of the given charts, first occurrence wins.
/// Unregistered ids contribute nothing.
pub fn dependencies_for<S: AsRef<str>>(ids: &[S]) -> Vec<ChartDependency> {
    let mut deps: Vec<ChartDependency> = Vec::new();
    for chart in ids.iter().filter_map(|id| get(id.as_ref())) {
        for dep in chart.dependencies {
            if !deps.iter().any(|d| d.name == dep.name) {
                deps.push(*dep);
            }
        }
    }
    deps
}
