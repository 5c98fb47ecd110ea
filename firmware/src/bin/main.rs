#![no_std]
#![no_main]

use defmt::{error, info};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{UART1, USB};
use embassy_rp::uart::{Config as UartConfig, Uart};
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use keyboard_to_gamepad_rp2040::{
    configure_usb_hid, ActiveReport, ActiveStatus, BridgeError, GamepadRemapper, HidReport,
    InputError, KeyboardBridge, ReportSignal, ReportSink, UartInputSource, UsbHidOutput,
    REMAP_CONFIG,
};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART1_IRQ => embassy_rp::uart::InterruptHandler<UART1>;
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Signal for passing gamepad reports from the remap task to the output task.
/// Using Signal instead of Channel provides "latest value wins" semantics,
/// which is appropriate for gamepad state where we only care about the most recent input.
static REPORT_SIGNAL: StaticCell<Signal<CriticalSectionRawMutex, ActiveReport>> =
    StaticCell::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();

type Bridge = KeyboardBridge<
    UartInputSource<'static>,
    ActiveReport,
    ActiveStatus,
    ReportSignal<ActiveReport>,
>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Keyboard-to-Gamepad starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // Initialize the report signal (latest-value semantics)
    let signal = REPORT_SIGNAL.init(Signal::new());

    // --- UART Setup ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = 115_200;

    let uart = Uart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );
    let (_tx, rx) = uart.split();
    let uart_input = UartInputSource::new(rx);

    // --- Status display ---
    #[cfg(feature = "display-oled")]
    let status = {
        let i2c = embassy_rp::i2c::I2c::new_blocking(
            p.I2C0,
            p.PIN_5, // SCL
            p.PIN_4, // SDA
            embassy_rp::i2c::Config::default(),
        );
        // SSD1306 needs a moment after power-up before it accepts commands.
        embassy_time::Timer::after_millis(100).await;
        let mut status = ActiveStatus::new(i2c);
        status.init();
        status
    };
    #[cfg(feature = "display-log")]
    let status = ActiveStatus::default();

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some("Rust Gamepad");
    usb_config.product = Some("Keyboard-to-Gamepad Remapper");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    // Configure HID class
    let hid_state = HID_STATE.init(State::new());
    let hid_writer = configure_usb_hid(&mut builder, hid_state);

    // Build the USB device
    let usb_device = builder.build();

    // Create output
    let usb_output = UsbHidOutput::new(hid_writer);

    // --- Remapper ---
    let remapper = GamepadRemapper::new(REMAP_CONFIG, ActiveReport::neutral(), status);
    let bridge = KeyboardBridge::new(uart_input, remapper, ReportSignal::new(signal));

    // Optional: LED for error indication (on-board LED on Pico)
    let led = Output::new(p.PIN_25, Level::Low);

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(usb_task(usb_device).unwrap());
    spawner.spawn(remap_task(bridge, led).unwrap());
    spawner.spawn(output_task(usb_output, signal).unwrap());

    info!(
        "Keyboard-to-Gamepad initialized with profile {}, waiting for keys...",
        REMAP_CONFIG.profile.name
    );
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// Remap task - feeds UART key events through the bridge and signals reports.
#[embassy_executor::task]
async fn remap_task(mut bridge: Bridge, mut led: Output<'static>) {
    bridge.remapper_mut().begin();
    loop {
        match bridge.process_one().await {
            Ok(()) => {}
            Err(BridgeError::Input(InputError::Disconnected)) => {
                info!("Keyboard detached, controls released");
            }
            Err(e) => {
                error!("Remap error: {:?}", e);
                // Toggle LED to indicate error
                led.toggle();
            }
        }
    }
}

/// Output task - waits for report signals and sends them to USB HID.
#[embassy_executor::task]
async fn output_task(
    mut output: UsbHidOutput<'static>,
    signal: &'static Signal<CriticalSectionRawMutex, ActiveReport>,
) {
    // Wait for USB to be ready
    output.wait_ready().await;
    info!("USB HID ready, forwarding gamepad reports...");

    loop {
        // Wait for the next report (blocks until signaled)
        let report = signal.wait().await;
        if let Err(e) = output.send(&report).await {
            error!("Output error: {:?}", e);
        }
    }
}
