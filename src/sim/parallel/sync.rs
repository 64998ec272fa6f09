//! 同步原语：计数许可（工作可用）与一次性完成闸门（窗口排空）。

use parking_lot::{Condvar, Mutex};

/// 计数信号量：每个可执行的就绪项对应一个许可，关闭时每个工作线程再补一个。
#[derive(Debug, Default)]
pub(crate) struct Permits {
    count: Mutex<usize>,
    cv: Condvar,
}

impl Permits {
    pub fn release(&self, n: usize) {
        if n == 0 {
            return;
        }
        let mut count = self.count.lock();
        *count += n;
        if n == 1 {
            self.cv.notify_one();
        } else {
            self.cv.notify_all();
        }
    }

    /// 阻塞直到拿到一个许可
    pub fn acquire(&self) {
        let mut count = self.count.lock();
        while *count == 0 {
            self.cv.wait(&mut count);
        }
        *count -= 1;
    }
}

/// 完成闸门：编排器在窗口内的工作全部完成之前阻塞在这里。
///
/// 每个窗口重新 `arm` 一次；`open` 可以重复调用。
#[derive(Debug)]
pub(crate) struct Gate {
    open: Mutex<bool>,
    cv: Condvar,
}

impl Gate {
    /// 创建时即为打开状态，使编排器第一次循环立即开窗。
    pub fn new_open() -> Self {
        Self {
            open: Mutex::new(true),
            cv: Condvar::new(),
        }
    }

    pub fn arm(&self) {
        *self.open.lock() = false;
    }

    pub fn open(&self) {
        let mut open = self.open.lock();
        *open = true;
        self.cv.notify_all();
    }

    pub fn wait(&self) {
        let mut open = self.open.lock();
        while !*open {
            self.cv.wait(&mut open);
        }
    }
}
