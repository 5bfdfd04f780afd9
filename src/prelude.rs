pub use crate::data_structs::{
    is_standard_like,
    is_standard_sample,
    CurveFit,
    DilutionScheme,
    LookupStrategy,
    QpcrCol,
    RawColumns,
    WellRecord,
};
pub use crate::io::{
    read_annotation,
    read_results,
    summary_path,
    write_outputs,
    ExportProfile,
};
pub use crate::pipeline::{
    back_calculate,
    fit_standard_curve,
    join_annotation,
    normalize,
    summarize,
    AnalysisOutput,
    QpcrAnalysis,
    StandardPoint,
};
