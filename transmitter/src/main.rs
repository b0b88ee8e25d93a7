#![deny(unsafe_code)]
#![no_main]
#![no_std]

use defmt_rtt as _;
use panic_probe as _;

mod coprocessor;
mod radio;

use cortex_m::singleton;

use stm32f1xx_hal::{
    prelude::*,
    gpio::{
        gpiob::{PB12, PB13},
        ExtiPin, Input, Output, PullDown, PushPull, Pxx,
    },
    spi::{Mode, Phase, Polarity, Spi},
};

use telemetry::{
    Idle, Parts, SensorEvent, SensorMonitor, TransmitterConfig, UniqueIdSource, WakeSignal,
    Worker,
};

use crate::coprocessor::Coprocessor;
use crate::radio::{Nrf24Link, Nrf24Params};

type DipSwitch = Pxx<Input<PullDown>>;
type PrimaryLed = PB12<Output<PushPull>>;
type SecondaryLed = PB13<Output<PushPull>>;

type Transmitter = Worker<'static, DipSwitch, Nrf24Link, PrimaryLed, SecondaryLed, WaitForEvent>;

/// Sleeps until the next event. The alert handler issues SEV after posting,
/// so a post that lands between the count check and WFE is not missed.
pub struct WaitForEvent;

impl Idle for WaitForEvent {
    fn idle(&mut self) {
        cortex_m::asm::wfe();
    }
}

/// The factory-programmed 96-bit unique device id; the low 64 bits are
/// enough for a 48-bit target id.
pub struct ChipUid;

impl ChipUid {
    const BASE: usize = 0x1FFF_F7E8;
}

impl UniqueIdSource for ChipUid {
    #[allow(unsafe_code)]
    fn read_unique_id(&self) -> u64 {
        // SAFETY: read-only system memory, always mapped on STM32F1
        let (low, high) = unsafe {
            (
                core::ptr::read_volatile(Self::BASE as *const u32),
                core::ptr::read_volatile((Self::BASE + 4) as *const u32),
            )
        };
        u64::from(high) << 32 | u64::from(low)
    }
}

// panic-probe still halts the core; this only keeps `defmt::panic!` from
// printing its message a second time
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}

fn fatal(error: telemetry::Error) -> ! {
    defmt::panic!("bring-up failed: {}", error)
}

#[rtic::app(device = stm32f1xx_hal::pac, peripherals = true)]
const APP: () = {
    struct Resources {
        monitor: SensorMonitor<'static, Coprocessor>,
        worker: Transmitter,
    }

    #[init]
    fn init(cx: init::Context) -> init::LateResources {
        // Take ownership over the raw flash and rcc devices and convert them into the corresponding
        // HAL structs
        let mut flash = cx.device.FLASH.constrain();
        let mut rcc = cx.device.RCC.constrain();

        // Freeze the configuration of all the clocks in the system and store the frozen frequencies in
        // `clocks`
        let clocks = rcc.cfgr.use_hse(8.mhz()).freeze(&mut flash.acr);

        // Prepare the alternate function I/O registers
        let mut afio = cx.device.AFIO.constrain(&mut rcc.apb2);

        let mut gpioa = cx.device.GPIOA.split(&mut rcc.apb2);
        let mut gpiob = cx.device.GPIOB.split(&mut rcc.apb2);

        let primary = gpiob.pb12.into_push_pull_output(&mut gpiob.crh);
        let secondary = gpiob.pb13.into_push_pull_output(&mut gpiob.crh);

        // Dip switches, bit 0 first
        let dip_switches = [
            gpiob.pb5.into_pull_down_input(&mut gpiob.crl).downgrade(),
            gpiob.pb6.into_pull_down_input(&mut gpiob.crl).downgrade(),
            gpiob.pb7.into_pull_down_input(&mut gpiob.crl).downgrade(),
            gpiob.pb8.into_pull_down_input(&mut gpiob.crh).downgrade(),
            gpiob.pb9.into_pull_down_input(&mut gpiob.crh).downgrade(),
            gpiob.pb10.into_pull_down_input(&mut gpiob.crh).downgrade(),
        ];

        let ce = gpiob.pb0.into_push_pull_output(&mut gpiob.crl);
        let csn = gpiob.pb1.into_push_pull_output(&mut gpiob.crl);

        let spi_pins = (
            gpioa.pa5.into_alternate_push_pull(&mut gpioa.crl),
            gpioa.pa6.into_floating_input(&mut gpioa.crl),
            gpioa.pa7.into_alternate_push_pull(&mut gpioa.crl),
        );

        let spi_mode = Mode {
            polarity: Polarity::IdleLow,
            phase: Phase::CaptureOnFirstTransition
        };

        let spi = Spi::spi1(
            cx.device.SPI1,
            spi_pins,
            &mut afio.mapr,
            spi_mode,
            1.mhz(),
            clocks,
            &mut rcc.apb2
        );

        let mut alert = gpioa.pa0.into_pull_down_input(&mut gpioa.crl);
        alert.make_interrupt_source(&mut afio);
        let coprocessor = Coprocessor::new(
            alert,
            gpioa.pa1.into_push_pull_output(&mut gpioa.crl),
            gpioa.pa2.into_push_pull_output(&mut gpioa.crl),
            cx.device.EXTI,
        );

        let wake: &'static WakeSignal = singleton!(: WakeSignal = WakeSignal::new()).unwrap();
        let config = TransmitterConfig::default();

        let task_mask = match config.sensor_task_mask() {
            Ok(task_mask) => task_mask,
            Err(error) => fatal(error),
        };
        let monitor = match SensorMonitor::start(coprocessor, wake, task_mask) {
            Ok(monitor) => monitor,
            Err(error) => fatal(error),
        };

        let worker = match Worker::bring_up(Parts {
            config,
            wake,
            idle: WaitForEvent,
            unique_id: ChipUid,
            dip_switches,
            radio: Nrf24Link::new(ce, csn, spi),
            radio_params: Nrf24Params::default(),
            leds: (primary, secondary),
        }) {
            Ok(worker) => worker,
            Err(error) => fatal(error),
        };

        defmt::info!("transmitter up, target id {=u64:x}", worker.identity().value());

        init::LateResources { monitor, worker }
    }

    #[idle(resources = [worker])]
    fn idle(cx: idle::Context) -> ! {
        cx.resources.worker.run()
    }

    #[task(binds = EXTI0, resources = [monitor])]
    fn alert(cx: alert::Context) {
        cx.resources.monitor.dispatch(SensorEvent::TaskAlert);
        cortex_m::asm::sev();
    }
};
