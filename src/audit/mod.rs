//! Administrator listings and company analytics across every job and application.

mod service;

pub use service::{
    ApplicationAuditFilter, ApplicationSummary, AuditError, AuditResult, AuditService,
    AuditedApplication, AuditedJob, CompanyAnalytics, JobAnalytics, JobAuditFilter,
    PaymentAnalytics, RECENT_APPLICATION_LIMIT, RecentApplication, StatusBreakdown,
};
