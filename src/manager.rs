//! Entry point for collaborators: encoding, decoding and QR generation, each available
//! synchronously or on the background executor.

use crate::decoder::decode_qr_data;
use crate::encoder::encode_payment;
use crate::error::{GenerateError, QrDataError};
use crate::executor::{CompletionContext, Immediate, ThreadExecutor};
use crate::models::{PaymentDataToEncode, PaymentDetails, ScanResult};
use crate::reference::DEFAULT_QR_SIZE;
use crate::render::{NoRenderer, QrRenderer};
use std::sync::Arc;

pub type DecodeResult = Result<PaymentDetails, QrDataError>;
pub type EncodeResult = Result<String, QrDataError>;
pub type GenerateResult<I> = Result<I, GenerateError>;

pub struct QrCodeManager<R = NoRenderer> {
    renderer: Arc<R>,
    executor: ThreadExecutor,
}

impl QrCodeManager<NoRenderer> {
    pub fn builder() -> QrCodeManagerBuilder<NoRenderer> {
        QrCodeManagerBuilder::new()
    }
}

impl<R: QrRenderer + 'static> QrCodeManager<R> {
    pub fn decode_qr_data(&self, data: &str) -> DecodeResult {
        decode_qr_data(data)
    }

    pub fn decode_qr_data_async<F>(&self, data: String, on_result: F)
    where
        F: FnOnce(DecodeResult) + Send + 'static,
    {
        self.executor.execute(move || decode_qr_data(&data), on_result);
    }

    pub fn encode_qr_data(&self, payment: &PaymentDataToEncode) -> EncodeResult {
        encode_payment(payment)
    }

    pub fn encode_qr_data_async<F>(&self, payment: PaymentDataToEncode, on_result: F)
    where
        F: FnOnce(EncodeResult) + Send + 'static,
    {
        self.executor.execute(move || encode_payment(&payment), on_result);
    }

    /// Encodes the payment and, only if that succeeds, renders the payload.
    pub fn generate_qr(
        &self,
        payment: &PaymentDataToEncode,
        width: u32,
        height: u32,
    ) -> GenerateResult<R::Image> {
        generate(self.renderer.as_ref(), payment, width, height)
    }

    /// [`generate_qr`](Self::generate_qr) at the default 400x400 pixels.
    pub fn generate_qr_default(&self, payment: &PaymentDataToEncode) -> GenerateResult<R::Image> {
        self.generate_qr(payment, DEFAULT_QR_SIZE, DEFAULT_QR_SIZE)
    }

    pub fn generate_qr_async<F>(
        &self,
        payment: PaymentDataToEncode,
        width: u32,
        height: u32,
        on_result: F,
    ) where
        F: FnOnce(GenerateResult<R::Image>) + Send + 'static,
    {
        let renderer = Arc::clone(&self.renderer);
        self.executor.execute(
            move || generate(renderer.as_ref(), &payment, width, height),
            on_result,
        );
    }

    /// Decodes what the scanner read. `None` when the scan carried no content.
    pub fn handle_scan_result(&self, scan: ScanResult) -> Option<DecodeResult> {
        decode_scan(scan)
    }

    pub fn handle_scan_result_async<F>(&self, scan: ScanResult, on_result: F)
    where
        F: FnOnce(Option<DecodeResult>) + Send + 'static,
    {
        self.executor.execute(move || decode_scan(scan), on_result);
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

fn decode_scan(scan: ScanResult) -> Option<DecodeResult> {
    match scan.content {
        Some(content) => Some(decode_qr_data(&content)),
        None => {
            log::warn!("QR content is null");
            None
        }
    }
}

fn generate<R: QrRenderer>(
    renderer: &R,
    payment: &PaymentDataToEncode,
    width: u32,
    height: u32,
) -> GenerateResult<R::Image> {
    let payload = encode_payment(payment)?;
    let image = renderer.render(&payload, width, height).map_err(|err| {
        log::warn!("rendering a {width}x{height} QR code failed: {err}");
        err
    })?;
    Ok(image)
}

pub struct QrCodeManagerBuilder<R = NoRenderer> {
    renderer: R,
    completion: Option<Arc<dyn CompletionContext>>,
    worker_threads: Option<usize>,
}

impl QrCodeManagerBuilder<NoRenderer> {
    pub fn new() -> Self {
        Self {
            renderer: NoRenderer,
            completion: None,
            worker_threads: None,
        }
    }
}

impl Default for QrCodeManagerBuilder<NoRenderer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: QrRenderer + 'static> QrCodeManagerBuilder<R> {
    pub fn renderer<T: QrRenderer + 'static>(self, renderer: T) -> QrCodeManagerBuilder<T> {
        QrCodeManagerBuilder {
            renderer,
            completion: self.completion,
            worker_threads: self.worker_threads,
        }
    }

    /// Where asynchronous results are delivered. Defaults to [`Immediate`].
    pub fn completion_context(mut self, completion: impl CompletionContext + 'static) -> Self {
        self.completion = Some(Arc::new(completion));
        self
    }

    /// Size of the worker pool. Defaults to the available hardware parallelism.
    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    pub fn build(self) -> QrCodeManager<R> {
        let completion = self
            .completion
            .unwrap_or_else(|| Arc::new(Immediate) as Arc<dyn CompletionContext>);
        let executor = match self.worker_threads {
            Some(threads) => ThreadExecutor::with_worker_threads(completion, threads),
            None => ThreadExecutor::new(completion),
        };
        log::debug!(
            "QR code manager ready with {} worker thread(s)",
            executor.worker_threads()
        );
        QrCodeManager {
            renderer: Arc::new(self.renderer),
            executor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn scan_forms_agree() {
        let manager = QrCodeManager::builder().worker_threads(1).build();
        let scans = [
            ScanResult::new(None),
            ScanResult::new(Some(String::new())),
            ScanResult::new(Some("BCD\n001\n1\nUCT\n".to_string())),
        ];
        for scan in scans {
            let expected = manager.handle_scan_result(scan.clone());
            let (tx, rx) = mpsc::channel();
            manager.handle_scan_result_async(scan, move |result| tx.send(result).unwrap());
            assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), expected);
        }
    }
}
