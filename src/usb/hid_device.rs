//! USB HID composite device - one interface, four report ids.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral, registers the lifecycle handler and the HID request handler,
//! and runs the device with suspend/remote-wakeup support.

use super::transport::{CONFIGURED, REMOTE_WAKEUP, REMOTE_WAKEUP_ENABLED, SUSPENDED};
use super::{post, UsbEvent, HOST_REPORT_MAX};
use core::sync::atomic::Ordering;
use defmt::{info, warn};
use embassy_futures::select::{select, Either};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_usb::class::hid::{
    Config as HidConfig, HidReader, HidReaderWriter, HidWriter, ReportId, RequestHandler, State,
};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Config, UsbDevice};
use hid_composite::config;
use hid_composite::hid::descriptor::COMPOSITE_REPORT_DESCRIPTOR;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

/// OUT endpoint size: the keyboard LED report plus its id.
const READ_N: usize = 8;
const WRITE_N: usize = config::USB_HID_MAX_PACKET as usize;

pub type UsbHidWriter = HidWriter<'static, UsbDriver, WRITE_N>;
pub type UsbHidReader = HidReader<'static, UsbDriver, READ_N>;

static HID_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_POWER_HANDLER: StaticCell<UsbPowerHandler> = StaticCell::new();
static CONTROL_REQUEST_HANDLER: StaticCell<HostRequestHandler> = StaticCell::new();

/// Forwards bus lifecycle callbacks to the control loop.
struct UsbPowerHandler;

impl embassy_usb::Handler for UsbPowerHandler {
    fn enabled(&mut self, enabled: bool) {
        if !enabled {
            CONFIGURED.store(false, Ordering::Release);
            SUSPENDED.store(false, Ordering::Release);
            post(UsbEvent::Unmounted);
        }
    }

    fn reset(&mut self) {
        if CONFIGURED.swap(false, Ordering::AcqRel) {
            post(UsbEvent::Unmounted);
        }
    }

    fn configured(&mut self, configured: bool) {
        info!("USB configured: {}", configured);
        CONFIGURED.store(configured, Ordering::Release);
        post(if configured {
            UsbEvent::Mounted
        } else {
            UsbEvent::Unmounted
        });
    }

    fn suspended(&mut self, suspended: bool) {
        info!("USB suspended: {}", suspended);
        SUSPENDED.store(suspended, Ordering::Release);
        post(if suspended {
            UsbEvent::Suspended {
                remote_wakeup_allowed: REMOTE_WAKEUP_ENABLED.load(Ordering::Acquire),
            }
        } else {
            UsbEvent::Resumed
        });
    }

    fn remote_wakeup_enabled(&mut self, enabled: bool) {
        REMOTE_WAKEUP_ENABLED.store(enabled, Ordering::Release);
    }
}

/// HID class requests.
///
/// SET_REPORT data arrives with the report id still in front on the control
/// pipe, and already stripped when it comes through the OUT endpoint reader.
pub struct HostRequestHandler {
    strip_report_id: bool,
}

impl HostRequestHandler {
    /// Handler for the OUT endpoint reader.
    pub const fn for_endpoint() -> Self {
        Self {
            strip_report_id: false,
        }
    }

    const fn for_control() -> Self {
        Self {
            strip_report_id: true,
        }
    }
}

impl RequestHandler for HostRequestHandler {
    fn get_report(&mut self, id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        // Input reports only go out on the interrupt endpoint.
        info!("GET_REPORT {} not supported", id);
        None
    }

    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        let ReportId::Out(report_id) = id else {
            warn!("SET_REPORT {} ignored", id);
            return OutResponse::Rejected;
        };

        let data = match data.split_first() {
            Some((&first, rest)) if self.strip_report_id && report_id != 0 && first == report_id => {
                rest
            }
            _ => data,
        };

        match heapless::Vec::<u8, HOST_REPORT_MAX>::from_slice(data) {
            Ok(data) => {
                post(UsbEvent::HostOutput { report_id, data });
                OutResponse::Accepted
            }
            Err(()) => {
                warn!("SET_REPORT {} too long: {} bytes", report_id, data.len());
                OutResponse::Rejected
            }
        }
    }
}

/// Build result: the device runner and the two halves of the HID interface.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub reader: UsbHidReader,
    pub writer: UsbHidWriter,
}

/// Initialise the USB stack and create the composite HID device.
///
/// Must be called exactly once. All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbHidDevice {
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;
    usb_config.supports_remote_wakeup = true;

    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    let power_handler = USB_POWER_HANDLER.init(UsbPowerHandler);
    builder.handler(power_handler);

    let hid_state = HID_STATE.init(State::new());
    let hid_config = HidConfig {
        report_descriptor: COMPOSITE_REPORT_DESCRIPTOR,
        request_handler: Some(CONTROL_REQUEST_HANDLER.init(HostRequestHandler::for_control())),
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: config::USB_HID_MAX_PACKET,
    };
    let hid = HidReaderWriter::<_, READ_N, WRITE_N>::new(&mut builder, hid_state, hid_config);
    let (reader, writer) = hid.split();

    let device = builder.build();

    info!("USB HID composite device initialised (kbd + mouse + consumer + gamepad)");

    UsbHidDevice {
        device,
        reader,
        writer,
    }
}

/// Run the USB device stack forever.
///
/// While suspended, waits for either the host to resume the bus or the
/// control loop to ask for a remote wakeup.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    loop {
        device.run_until_suspend().await;
        // Drop a request that raced with a host-initiated resume.
        REMOTE_WAKEUP.reset();
        match select(device.wait_resume(), REMOTE_WAKEUP.wait()).await {
            Either::First(()) => {}
            Either::Second(()) => {
                info!("signalling remote wakeup");
                if let Err(e) = device.remote_wakeup().await {
                    warn!("remote wakeup failed: {}", e);
                }
            }
        }
    }
}

/// Serve OUT endpoint reports (keyboard LEDs) forever.
pub async fn hid_reader_task(reader: UsbHidReader) -> ! {
    let mut handler = HostRequestHandler::for_endpoint();
    reader.run(true, &mut handler).await
}
