//! Composite USB HID firmware for the nRF52840.
//!
//! Keyboard, mouse, consumer control and gamepad share one interrupt IN
//! endpoint. Three futures run on the thread executor:
//!
//! 1. USB device: enumeration, suspend, remote wakeup
//! 2. HID endpoints: the report writer and the OUT report reader
//! 3. Control loop: drains USB events, polls the [`App`] every millisecond
//!    and mirrors its LED outputs onto the board

#![no_std]
#![no_main]

mod usb;

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_futures::join::join4;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::pac;
use embassy_time::{Instant, Timer};
use hid_composite::config::{LED_ACTIVE_LOW, LOOP_POLL_MS};
use hid_composite::input::InputPins;
use hid_composite::App;
use usb::transport::UsbTransport;
use usb::{UsbEvent, EVENTS};
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());

    // USBD needs the external high-frequency crystal.
    pac::CLOCK.tasks_hfclkstart().write_value(1);
    while pac::CLOCK.events_hfclkstarted().read() != 1 {}

    info!("hid-composite starting");

    let pins = InputPins {
        up: Some(Input::new(p.P0_03, Pull::Up)),
        right: Some(Input::new(p.P0_04, Pull::Up)),
        down: Some(Input::new(p.P0_28, Pull::Up)),
        left: Some(Input::new(p.P0_29, Pull::Up)),
        circle: Some(Input::new(p.P0_11, Pull::Up)),
        trigger: Some(Input::new(p.P0_12, Pull::Up)),
    };
    let mut heartbeat_led = Output::new(p.P0_13, led_level(false), OutputDrive::Standard);
    let mut mode_led = Output::new(p.P0_14, led_level(false), OutputDrive::Standard);

    let usb::hid_device::UsbHidDevice {
        device,
        reader,
        writer,
    } = usb::hid_device::init(p.USBD);

    let usb_fut = usb::hid_device::run_usb_device(device);
    let writer_fut = usb::transport::hid_writer_task(writer);
    let reader_fut = usb::hid_device::hid_reader_task(reader);

    let control_fut = async {
        let mut app = App::new(pins, Instant::now().as_millis());
        let mut transport = UsbTransport;

        loop {
            if let Either::First(event) =
                select(EVENTS.receive(), Timer::after_millis(LOOP_POLL_MS)).await
            {
                dispatch(&mut app, &mut transport, event);
            }

            app.poll(Instant::now().as_millis(), &mut transport);

            heartbeat_led.set_level(led_level(app.led()));
            mode_led.set_level(led_level(app.mode_indicator()));
        }
    };

    join4(usb_fut, writer_fut, reader_fut, control_fut).await;
}

fn dispatch(app: &mut App<Input<'static>>, transport: &mut UsbTransport, event: UsbEvent) {
    match event {
        UsbEvent::Mounted => app.on_mount(),
        UsbEvent::Unmounted => app.on_unmount(),
        UsbEvent::Suspended {
            remote_wakeup_allowed,
        } => app.on_suspend(remote_wakeup_allowed),
        UsbEvent::Resumed => app.on_resume(),
        UsbEvent::ReportSent(channel) => {
            app.on_report_sent(channel, transport);
        }
        UsbEvent::HostOutput { report_id, data } => {
            if let Err(e) = app.on_host_output_report(report_id, &data) {
                warn!("host output report {} ignored: {}", report_id, e);
            }
        }
    }
}

fn led_level(on: bool) -> Level {
    if on == LED_ACTIVE_LOW {
        Level::Low
    } else {
        Level::High
    }
}
