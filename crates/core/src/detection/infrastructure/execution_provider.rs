use ort::execution_providers::ExecutionProviderDispatch;

/// Execution providers to register for the current platform.
///
/// ONNX Runtime falls back to the CPU provider when none of these can be
/// initialised, so an empty list means CPU only.
pub fn preferred_execution_providers() -> Vec<ExecutionProviderDispatch> {
    log::debug!("Requesting execution provider: {}", platform_provider_name());
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}

/// Human-readable name of the accelerator tried on this platform.
pub fn platform_provider_name() -> &'static str {
    if cfg!(target_os = "macos") {
        "CoreML"
    } else if cfg!(target_os = "windows") {
        "DirectML"
    } else {
        "CPU"
    }
}
