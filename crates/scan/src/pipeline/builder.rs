use crate::{
    algorithms::{AreaOverlapFilter, FloodFillGrower, GradientEdgePreprocessor},
    config::DetectorConfig,
    pipeline::Pipeline,
    traits::{EdgePreprocessor, RegionGrower, RegionFilter},
};

/// Builder for creating detection pipelines with a fluent API
pub struct PipelineBuilder {
    preprocessor: Option<Box<dyn EdgePreprocessor>>,
    grower: Option<Box<dyn RegionGrower>>,
    filter: Option<Box<dyn RegionFilter>>,
    config: DetectorConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            preprocessor: None,
            grower: None,
            filter: None,
            config: DetectorConfig::default(),
        }
    }

    /// Set the edge preprocessor (replaces any existing one)
    pub fn set_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: EdgePreprocessor + 'static,
    {
        self.preprocessor = Some(Box::new(preprocessor));
        self
    }

    /// Set the region grower (replaces any existing one)
    pub fn set_grower<G>(mut self, grower: G) -> Self
    where
        G: RegionGrower + 'static,
    {
        self.grower = Some(Box::new(grower));
        self
    }

    /// Set the region filter. Overrides the area settings below.
    pub fn set_filter<F>(mut self, filter: F) -> Self
    where
        F: RegionFilter + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Use the thresholds from a detector config for the default filter
    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_min_area(mut self, min_area: u32) -> Self {
        self.config.min_area = min_area;
        self
    }

    pub fn with_area_tolerance(mut self, area_tolerance: u32) -> Self {
        self.config.area_tolerance = area_tolerance;
        self
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> Pipeline {
        let preprocessor = self.preprocessor
            .unwrap_or_else(|| Box::new(GradientEdgePreprocessor));

        let grower = self.grower
            .unwrap_or_else(|| Box::new(FloodFillGrower));

        let config = self.config;
        let filter = self.filter
            .unwrap_or_else(|| Box::new(AreaOverlapFilter::from(&config)));

        Pipeline::new(preprocessor, grower, filter)
    }

    /// Build a pipeline from a detector config
    pub fn build_with_config(config: &DetectorConfig) -> Pipeline {
        Self::new().with_config(config.clone()).build()
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
