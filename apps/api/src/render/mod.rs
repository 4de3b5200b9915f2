// Print rendering: PageModel → declarative page tree for the exporter.
// PDF byte generation happens in the exporter, outside this service.

pub mod print;
